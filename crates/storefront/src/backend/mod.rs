//! Backend: the remote tables the storefront reads and writes.
//!
//! Three seams, one per consumer:
//!
//! - [`CatalogBackend`] - the `products` table the shopper adds from
//! - [`OrderBackend`] - customer lookup and the inserts checkout makes
//! - [`SellerBackend`] - order listing and status changes for the seller
//!
//! [`RestBackend`] implements all three over a PostgREST-style HTTP API.

mod rest;
mod types;

pub use rest::RestBackend;
pub use types::*;

use std::future::Future;

use thiserror::Error;

use bella_core::{Email, OrderId, OrderStatus, ProductId};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Requested row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Remote storage for customers and orders.
pub trait OrderBackend {
    /// Look up the customer profile registered under `email`.
    ///
    /// Returns [`BackendError::NotFound`] if there is none.
    fn find_customer(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Customer, BackendError>> + Send;

    /// Insert an order and return the stored row.
    fn create_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<OrderRecord, BackendError>> + Send;

    /// Insert the item rows of an order.
    fn insert_order_items(
        &self,
        items: &[NewOrderItem],
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// Read access to the product catalog.
pub trait CatalogBackend {
    /// Every product on sale.
    fn list_products(
        &self,
    ) -> impl Future<Output = Result<Vec<CatalogProduct>, BackendError>> + Send;

    /// The product with `id`.
    ///
    /// Returns [`BackendError::NotFound`] if there is none.
    fn find_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<CatalogProduct, BackendError>> + Send;
}

/// Order management for the seller.
pub trait SellerBackend {
    /// Most recent orders first, optionally only those in `status`.
    fn list_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> impl Future<Output = Result<Vec<OrderSummary>, BackendError>> + Send;

    /// The item rows of an order.
    fn order_items(
        &self,
        order_id: &OrderId,
    ) -> impl Future<Output = Result<Vec<OrderItemDetail>, BackendError>> + Send;

    /// Set an order's status and return the updated row.
    ///
    /// Returns [`BackendError::NotFound`] if no order has `order_id`.
    fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> impl Future<Output = Result<OrderRecord, BackendError>> + Send;
}
