//! Rows exchanged with the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bella_core::{CustomerId, OrderId, OrderStatus, Price, Product, ProductId, Quantity};

/// A row of the `products` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CatalogProduct {
    /// The reference a cart line copies.
    #[must_use]
    pub fn into_product(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            price: self.price,
            image_url: self.image_url,
        }
    }
}

/// A shopper's profile from the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Customer {
    /// Name to address the customer by, falling back to a generic label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Cliente")
    }
}

/// Insert payload for the `orders` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    pub user_id: CustomerId,
    pub total_price: Price,
    /// When an unpaid order is cancelled automatically.
    pub cancel_at: DateTime<Utc>,
}

/// An `orders` row as returned after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub user_id: CustomerId,
    pub total_price: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancel_at: Option<DateTime<Utc>>,
}

/// Insert payload for the `order_items` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub unit_price: Price,
}

/// Customer fields embedded in an order listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomer {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// An `orders` row joined with its customer, as the seller sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: OrderId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub total_price: Price,
    #[serde(default)]
    pub status: OrderStatus,
    /// Embedded `users` row; absent if the customer was deleted.
    #[serde(rename = "users", default)]
    pub customer: Option<OrderCustomer>,
}

impl OrderSummary {
    #[must_use]
    pub fn customer_name(&self) -> &str {
        self.customer
            .as_ref()
            .and_then(|c| c.full_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Sin nombre")
    }
}

/// Product fields embedded in an order item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemProduct {
    pub name: String,
}

/// An `order_items` row joined with its product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemDetail {
    pub quantity: Quantity,
    pub unit_price: Price,
    /// Embedded `products` row; absent if the product was deleted.
    #[serde(rename = "products", default)]
    pub product: Option<OrderItemProduct>,
}

impl OrderItemDetail {
    #[must_use]
    pub fn product_name(&self) -> &str {
        self.product
            .as_ref()
            .map_or("Producto eliminado", |p| p.name.as_str())
    }

    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_record_from_backend_row() {
        let row = serde_json::json!({
            "id": 118,
            "user_id": "5b0c1e9e-8f3e-4d59-9a53-0d0d4f1f8c11",
            "total_price": 75.5,
            "status": "pendiente",
            "created_at": "2025-03-01T14:02:11.52073+00:00",
            "cancel_at": "2025-03-03T14:02:11.52+00:00"
        });
        let order: OrderRecord = serde_json::from_value(row).unwrap();
        assert_eq!(order.id.as_str(), "118");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_price, Price::from_cents(7550));
        assert!(order.cancel_at.is_some());
    }

    #[test]
    fn test_catalog_row_into_product() {
        let row = serde_json::json!({
            "id": 7,
            "name": "Labial mate",
            "description": "Larga duración",
            "price": 35.5,
            "image_url": "https://cdn.example/labial.png",
            "stock": 12
        });
        let product = serde_json::from_value::<CatalogProduct>(row)
            .unwrap()
            .into_product();
        assert_eq!(product.id.as_str(), "7");
        assert_eq!(product.price, Price::from_cents(3550));
        assert_eq!(product.image_url.as_deref(), Some("https://cdn.example/labial.png"));
    }

    #[test]
    fn test_order_summary_with_embedded_customer() {
        let row = serde_json::json!({
            "id": 118,
            "created_at": "2025-03-01T14:02:11.52073+00:00",
            "total_price": 75.5,
            "status": "completado",
            "users": {"full_name": "Ana Pérez", "phone": "71234567"}
        });
        let order: OrderSummary = serde_json::from_value(row).unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.customer_name(), "Ana Pérez");

        let orphan: OrderSummary = serde_json::from_value(serde_json::json!({
            "id": 119, "total_price": 10, "status": "anulado", "users": null
        }))
        .unwrap();
        assert_eq!(orphan.status, OrderStatus::Cancelled);
        assert_eq!(orphan.customer_name(), "Sin nombre");
    }

    #[test]
    fn test_order_item_detail_with_embedded_product() {
        let item: OrderItemDetail = serde_json::from_value(serde_json::json!({
            "quantity": 3, "unit_price": 12.5, "products": {"name": "Rubor"}
        }))
        .unwrap();
        assert_eq!(item.product_name(), "Rubor");
        assert_eq!(item.line_total(), Price::from_cents(3750));

        let gone: OrderItemDetail = serde_json::from_value(serde_json::json!({
            "quantity": 1, "unit_price": 5, "products": null
        }))
        .unwrap();
        assert_eq!(gone.product_name(), "Producto eliminado");
    }

    #[test]
    fn test_customer_display_name_fallback() {
        let customer = Customer {
            id: CustomerId::new("1"),
            full_name: Some("  ".to_owned()),
            phone: None,
            address: None,
        };
        assert_eq!(customer.display_name(), "Cliente");
    }
}
