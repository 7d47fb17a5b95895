//! Seller order commands.

use bella_core::OrderId;
use bella_storefront::error::{Result, add_breadcrumb};
use bella_storefront::orders::{self, OrderFilter, Resolution};

use crate::output;

pub async fn list(filter: &OrderFilter) -> Result<()> {
    add_breadcrumb("orders", "list", None);
    let backend = super::backend()?;
    let orders = orders::recent_orders(&backend, filter).await?;
    output::orders(&orders);
    Ok(())
}

pub async fn show(id: String) -> Result<()> {
    let id = OrderId::new(id);
    let backend = super::backend()?;
    let items = orders::order_items(&backend, &id).await?;
    output::order_items(&id, &items);
    Ok(())
}

/// Complete or cancel order `id`.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown order and `AppError::Backend`
/// if the update fails.
pub async fn resolve(id: String, resolution: Resolution) -> Result<()> {
    let id = OrderId::new(id);
    add_breadcrumb("orders", "resolve", Some(&[("order_id", id.as_str())]));
    let backend = super::backend()?;
    let record = orders::resolve_order(&backend, &id, resolution).await?;
    output::line(&format!("Pedido #{} {}", record.id, record.status));
    Ok(())
}
