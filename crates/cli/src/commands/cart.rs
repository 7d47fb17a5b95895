//! Cart commands.
//!
//! Adding goes through the catalog, see [`super::catalog`]. Each mutation
//! goes through the session's store, which persists the cart before
//! returning, then the resulting cart is printed.

use bella_core::ProductId;
use bella_storefront::error::{Result, add_breadcrumb};
use bella_storefront::state::Session;
use tracing::info;

use crate::output;

pub fn increase(session: &mut Session, id: String) {
    let id = ProductId::new(id);
    session.cart_mut().increase(&id);
    report_missing(session, &id);
    output::cart(session.cart().cart());
}

pub fn decrease(session: &mut Session, id: String) {
    let id = ProductId::new(id);
    session.cart_mut().decrease(&id);
    report_missing(session, &id);
    output::cart(session.cart().cart());
}

pub fn remove(session: &mut Session, id: String) {
    let id = ProductId::new(id);
    session.cart_mut().remove_from_cart(&id);
    output::cart(session.cart().cart());
}

pub fn clear(session: &mut Session) {
    session.cart_mut().clear_cart();
    info!("cart cleared");
    output::cart(session.cart().cart());
}

/// Print the cart, as a table or as its stored JSON document.
///
/// # Errors
///
/// Returns `AppError::Storage` if the cart cannot be serialized.
pub fn show(session: &Session, json: bool) -> Result<()> {
    add_breadcrumb("cart", "show", None);
    if json {
        let document = serde_json::to_string_pretty(session.cart().cart())
            .map_err(bella_storefront::storage::StorageError::from)?;
        output::line(&document);
    } else {
        output::cart(session.cart().cart());
    }
    Ok(())
}

/// Unknown ids are a silent no-op in the store; tell the shopper.
fn report_missing(session: &Session, id: &ProductId) {
    if session.cart().get(id).is_none() {
        output::notice(&format!("{id} no está en el carrito"));
    }
}
