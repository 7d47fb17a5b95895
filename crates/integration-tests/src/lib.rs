//! Integration tests for the Bella storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bella-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Cart operations and persistence across sessions
//! - `catalog` - Adding catalog products to the cart
//! - `checkout` - Order placement against a recording backend
//! - `orders` - Seller order listing and status changes
//!
//! Nothing here talks to the network; [`RecordingBackend`] stands in for the
//! backend.

use std::sync::{Mutex, PoisonError};

use bella_core::{CustomerId, Email, OrderId, OrderStatus, Price, Product, ProductId};
use bella_storefront::backend::{
    BackendError, CatalogBackend, CatalogProduct, Customer, NewOrder, NewOrderItem, OrderBackend,
    OrderCustomer, OrderItemDetail, OrderRecord, OrderSummary, SellerBackend,
};

/// Product with a whole-boliviano price.
#[must_use]
pub fn product(id: &str, bolivianos: u32) -> Product {
    Product::new(id, format!("Producto {id}"), Price::from_cents(bolivianos * 100))
}

/// Which backend call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailAt {
    #[default]
    Nowhere,
    FindCustomer,
    CreateOrder,
    InsertItems,
    Catalog,
    Seller,
}

/// In-memory backend that records every write.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    customers: Vec<(Email, Customer)>,
    products: Vec<CatalogProduct>,
    fail_at: FailAt,
    orders: Mutex<Vec<NewOrder>>,
    items: Mutex<Vec<NewOrderItem>>,
    placed: Mutex<Vec<OrderSummary>>,
    placed_items: Vec<(OrderId, OrderItemDetail)>,
    lookups: Mutex<usize>,
}

impl RecordingBackend {
    /// Backend knowing a single customer.
    #[must_use]
    pub fn with_customer(email: &Email, customer: Customer) -> Self {
        Self {
            customers: vec![(email.clone(), customer)],
            ..Self::default()
        }
    }

    /// Add products to the catalog.
    #[must_use]
    pub fn with_products(mut self, products: impl IntoIterator<Item = CatalogProduct>) -> Self {
        self.products.extend(products);
        self
    }

    /// Seed orders the seller can list, newest first.
    #[must_use]
    pub fn with_placed_orders(mut self, orders: impl IntoIterator<Item = OrderSummary>) -> Self {
        self.placed
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(orders);
        self
    }

    /// Seed the items of a placed order.
    #[must_use]
    pub fn with_placed_item(mut self, order_id: &str, item: OrderItemDetail) -> Self {
        self.placed_items.push((OrderId::new(order_id), item));
        self
    }

    /// Make one call fail with a server error.
    #[must_use]
    pub const fn failing_at(mut self, fail_at: FailAt) -> Self {
        self.fail_at = fail_at;
        self
    }

    /// Orders inserted so far.
    #[must_use]
    pub fn orders(&self) -> Vec<NewOrder> {
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Order items inserted so far.
    #[must_use]
    pub fn items(&self) -> Vec<NewOrderItem> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Seeded orders as they stand now.
    #[must_use]
    pub fn placed_orders(&self) -> Vec<OrderSummary> {
        self.placed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Catalog lookups made so far.
    #[must_use]
    pub fn catalog_lookups(&self) -> usize {
        *self.lookups.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fail(&self, at: FailAt) -> Result<(), BackendError> {
        if self.fail_at == at {
            return Err(BackendError::Api {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl OrderBackend for RecordingBackend {
    async fn find_customer(&self, email: &Email) -> Result<Customer, BackendError> {
        self.fail(FailAt::FindCustomer)?;
        self.customers
            .iter()
            .find(|(known, _)| known == email)
            .map(|(_, customer)| customer.clone())
            .ok_or_else(|| BackendError::NotFound(format!("customer {email}")))
    }

    async fn create_order(&self, order: &NewOrder) -> Result<OrderRecord, BackendError> {
        self.fail(FailAt::CreateOrder)?;
        let mut orders = self.orders.lock().unwrap_or_else(PoisonError::into_inner);
        orders.push(order.clone());
        Ok(OrderRecord {
            id: OrderId::new(orders.len().to_string()),
            user_id: order.user_id.clone(),
            total_price: order.total_price,
            status: OrderStatus::Pending,
            created_at: None,
            cancel_at: Some(order.cancel_at),
        })
    }

    async fn insert_order_items(&self, items: &[NewOrderItem]) -> Result<(), BackendError> {
        self.fail(FailAt::InsertItems)?;
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(items);
        Ok(())
    }
}

impl CatalogBackend for RecordingBackend {
    async fn list_products(&self) -> Result<Vec<CatalogProduct>, BackendError> {
        self.fail(FailAt::Catalog)?;
        let mut products = self.products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn find_product(&self, id: &ProductId) -> Result<CatalogProduct, BackendError> {
        *self.lookups.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.fail(FailAt::Catalog)?;
        self.products
            .iter()
            .find(|product| &product.id == id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("product {id}")))
    }
}

impl SellerBackend for RecordingBackend {
    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderSummary>, BackendError> {
        self.fail(FailAt::Seller)?;
        Ok(self
            .placed_orders()
            .into_iter()
            .filter(|order| status.is_none_or(|status| order.status == status))
            .collect())
    }

    async fn order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItemDetail>, BackendError> {
        self.fail(FailAt::Seller)?;
        Ok(self
            .placed_items
            .iter()
            .filter(|(id, _)| id == order_id)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<OrderRecord, BackendError> {
        self.fail(FailAt::Seller)?;
        let mut placed = self.placed.lock().unwrap_or_else(PoisonError::into_inner);
        let order = placed
            .iter_mut()
            .find(|order| &order.id == order_id)
            .ok_or_else(|| BackendError::NotFound(format!("order {order_id}")))?;
        order.status = status;
        Ok(OrderRecord {
            id: order.id.clone(),
            user_id: CustomerId::new("u-1"),
            total_price: order.total_price,
            status,
            created_at: order.created_at,
            cancel_at: None,
        })
    }
}

/// A catalog row with a whole-boliviano price.
#[must_use]
pub fn catalog_product(id: &str, name: &str, bolivianos: u32) -> CatalogProduct {
    CatalogProduct {
        id: ProductId::new(id),
        name: name.to_string(),
        description: None,
        price: Price::from_cents(bolivianos * 100),
        image_url: Some(format!("https://cdn.example/{id}.png")),
    }
}

/// A placed order for `customer`, or for a deleted customer if `None`.
#[must_use]
pub fn placed_order(id: &str, customer: Option<&str>, status: OrderStatus) -> OrderSummary {
    OrderSummary {
        id: OrderId::new(id),
        created_at: None,
        total_price: Price::from_cents(5000),
        status,
        customer: customer.map(|name| OrderCustomer {
            full_name: Some(name.to_string()),
            phone: Some("71234567".to_string()),
        }),
    }
}

/// A customer with a complete profile.
#[must_use]
pub fn customer(id: &str, name: &str) -> Customer {
    Customer {
        id: CustomerId::new(id),
        full_name: Some(name.to_string()),
        phone: Some("76543210".to_string()),
        address: Some("Calle Sucre 45, La Paz".to_string()),
    }
}
