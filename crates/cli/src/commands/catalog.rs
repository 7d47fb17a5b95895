//! Catalog commands.

use bella_core::ProductId;
use bella_storefront::backend::CatalogBackend;
use bella_storefront::catalog::add_from_catalog;
use bella_storefront::error::{Result, add_breadcrumb};
use bella_storefront::state::Session;

use crate::output;

/// Print the products on sale.
///
/// # Errors
///
/// Returns `AppError::Config` without backend settings and
/// `AppError::Backend` if the catalog cannot be fetched.
pub async fn products() -> Result<()> {
    add_breadcrumb("catalog", "list", None);
    let backend = super::backend()?;
    let products = backend.list_products().await?;
    output::products(&products);
    Ok(())
}

/// Add `quantity` units of catalog product `id` to the cart.
///
/// # Errors
///
/// Returns `AppError::Cart` for a quantity out of range, `AppError::NotFound`
/// for an unknown product, and `AppError::Backend` if the catalog cannot be
/// reached. The cart is unchanged on error.
pub async fn add(session: &mut Session, id: String, quantity: u32) -> Result<()> {
    let id = ProductId::new(id);
    let backend = super::backend()?;
    add_from_catalog(&backend, session.cart_mut(), &id, quantity).await?;
    output::cart(session.cart().cart());
    Ok(())
}
