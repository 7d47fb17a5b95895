//! Seller order management: recent orders, their items, and closing them.

use tracing::info;

use bella_core::{OrderId, OrderStatus};

use crate::backend::{OrderItemDetail, OrderRecord, OrderSummary, SellerBackend};
use crate::error::{AppError, Result};

/// Orders shown when no limit is given.
pub const DEFAULT_ORDER_LIMIT: usize = 10;

/// Which orders a listing shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFilter {
    /// Only orders in this status.
    pub status: Option<OrderStatus>,
    /// Case-insensitive fragment of the customer's name.
    pub customer: Option<String>,
    /// Most orders returned.
    pub limit: usize,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            status: None,
            customer: None,
            limit: DEFAULT_ORDER_LIMIT,
        }
    }
}

impl OrderFilter {
    /// Whether `order` passes the status and customer criteria.
    #[must_use]
    pub fn matches(&self, order: &OrderSummary) -> bool {
        if self.status.is_some_and(|status| order.status != status) {
            return false;
        }
        match self.customer.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(fragment) => order
                .customer
                .as_ref()
                .and_then(|c| c.full_name.as_deref())
                .is_some_and(|name| name.to_lowercase().contains(&fragment.to_lowercase())),
        }
    }

    /// Keep matching orders, in their given order, up to the limit.
    #[must_use]
    pub fn apply(&self, orders: Vec<OrderSummary>) -> Vec<OrderSummary> {
        orders
            .into_iter()
            .filter(|order| self.matches(order))
            .take(self.limit)
            .collect()
    }
}

/// How the seller closes a pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Paid and delivered.
    Complete,
    /// Abandoned or refused.
    Cancel,
}

impl Resolution {
    #[must_use]
    pub const fn status(self) -> OrderStatus {
        match self {
            Self::Complete => OrderStatus::Completed,
            Self::Cancel => OrderStatus::Cancelled,
        }
    }
}

/// Most recent orders first, filtered.
///
/// # Errors
///
/// Returns [`AppError::Backend`] if the backend cannot be reached.
pub async fn recent_orders<B: SellerBackend>(
    backend: &B,
    filter: &OrderFilter,
) -> Result<Vec<OrderSummary>> {
    let orders = backend.list_orders(filter.status).await?;
    Ok(filter.apply(orders))
}

/// The items of an order.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if the order has no items, which is only
/// the case for an unknown id, and [`AppError::Backend`] on backend failure.
pub async fn order_items<B: SellerBackend>(
    backend: &B,
    order_id: &OrderId,
) -> Result<Vec<OrderItemDetail>> {
    let items = backend.order_items(order_id).await?;
    if items.is_empty() {
        return Err(AppError::NotFound(format!("order {order_id}")));
    }
    Ok(items)
}

/// Mark an order completed or cancelled.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] for an unknown id and
/// [`AppError::Backend`] on backend failure.
pub async fn resolve_order<B: SellerBackend>(
    backend: &B,
    order_id: &OrderId,
    resolution: Resolution,
) -> Result<OrderRecord> {
    let record = backend
        .update_order_status(order_id, resolution.status())
        .await
        .map_err(AppError::from_lookup)?;
    info!(order_id = %record.id, status = %record.status, "order resolved");
    Ok(record)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bella_core::Price;

    use super::*;
    use crate::backend::OrderCustomer;

    fn order(id: &str, name: Option<&str>, status: OrderStatus) -> OrderSummary {
        OrderSummary {
            id: OrderId::new(id),
            created_at: None,
            total_price: Price::from_cents(1000),
            status,
            customer: name.map(|n| OrderCustomer {
                full_name: Some(n.to_string()),
                phone: None,
            }),
        }
    }

    fn ids(orders: &[OrderSummary]) -> Vec<&str> {
        orders.iter().map(|o| o.id.as_str()).collect()
    }

    fn sample() -> Vec<OrderSummary> {
        vec![
            order("5", Some("Ana Pérez"), OrderStatus::Pending),
            order("4", Some("Lucía Mamani"), OrderStatus::Completed),
            order("3", None, OrderStatus::Pending),
            order("2", Some("ANA Quispe"), OrderStatus::Cancelled),
            order("1", Some("Rosa Choque"), OrderStatus::Pending),
        ]
    }

    #[test]
    fn test_default_keeps_everything_up_to_limit() {
        assert_eq!(ids(&OrderFilter::default().apply(sample())), ["5", "4", "3", "2", "1"]);

        let filter = OrderFilter {
            limit: 2,
            ..OrderFilter::default()
        };
        assert_eq!(ids(&filter.apply(sample())), ["5", "4"]);
    }

    #[test]
    fn test_customer_match_ignores_case() {
        let filter = OrderFilter {
            customer: Some("ana".to_string()),
            ..OrderFilter::default()
        };
        assert_eq!(ids(&filter.apply(sample())), ["5", "2"]);
    }

    #[test]
    fn test_blank_customer_matches_orders_without_one() {
        let filter = OrderFilter {
            customer: Some("  ".to_string()),
            ..OrderFilter::default()
        };
        assert_eq!(filter.apply(sample()).len(), 5);
    }

    #[test]
    fn test_status_and_limit_combined() {
        let filter = OrderFilter {
            status: Some(OrderStatus::Pending),
            customer: None,
            limit: 2,
        };
        assert_eq!(ids(&filter.apply(sample())), ["5", "3"]);
    }

    #[test]
    fn test_resolution_statuses() {
        assert_eq!(Resolution::Complete.status(), OrderStatus::Completed);
        assert_eq!(Resolution::Cancel.status(), OrderStatus::Cancelled);
    }
}
