//! Adding catalog products to the cart.
//!
//! The shopper names a product by id; name, price and image come from the
//! `products` table so the cart never carries prices the shopper typed.

use tracing::info;

use bella_core::{Product, ProductId, Quantity};

use crate::backend::CatalogBackend;
use crate::cart::{CartError, CartStore};
use crate::error::{AppError, Result};

/// Look up `id` in the catalog and add `quantity` units of it to the cart.
///
/// The quantity is validated before the catalog is queried.
///
/// # Errors
///
/// - [`AppError::Cart`] if `quantity` is zero or above [`Quantity::MAX`]
/// - [`AppError::NotFound`] if the catalog has no product `id`
/// - [`AppError::Backend`] if the catalog cannot be reached
pub async fn add_from_catalog<B: CatalogBackend>(
    backend: &B,
    store: &mut CartStore,
    id: &ProductId,
    quantity: u32,
) -> Result<Product> {
    let quantity = Quantity::new(quantity).map_err(CartError::from)?;
    let product = backend
        .find_product(id)
        .await
        .map_err(AppError::from_lookup)?
        .into_product();

    store.add_to_cart(product.clone(), quantity);
    info!(product_id = %product.id, price = %product.price, quantity = quantity.get(), "added from catalog");
    Ok(product)
}
