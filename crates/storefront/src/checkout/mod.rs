//! Checkout handoff.
//!
//! Turns the cart into an order on the backend, then hands the shopper over
//! to the seller on WhatsApp:
//!
//! 1. Read the cart once into an [`OrderPayload`]
//! 2. Look up the signed-in customer's profile
//! 3. Insert the order, then its item rows
//! 4. Build the seller message and click-to-chat link
//! 5. Clear the cart
//!
//! The cart is cleared only after both inserts succeed; any earlier failure
//! returns an error and leaves the cart as it was.

mod message;

pub use message::{build_order_message, whatsapp_url};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use bella_core::{Email, OrderId, Price, ProductId, Quantity};

use crate::backend::{BackendError, NewOrder, NewOrderItem, OrderBackend, OrderRecord};
use crate::cart::{Cart, CartStore};

/// Default time an unpaid order is held before cancellation.
pub const DEFAULT_ORDER_HOLD_DAYS: i64 = 2;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The order total is above what a stored price can hold.
    #[error("order total {0} exceeds the maximum of Bs {max}", max = Price::MAX_AMOUNT)]
    TotalTooLarge(Price),

    /// No customer profile exists for the signed-in email.
    #[error("no customer profile for {0}")]
    CustomerNotFound(Email),

    /// The backend rejected or failed a request.
    #[error("order backend error: {0}")]
    Backend(#[from] BackendError),

    /// The handoff link could not be built.
    #[error("invalid handoff link: {0}")]
    Handoff(#[from] url::ParseError),
}

/// One ordered product, as read from the cart at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: Quantity,
    pub unit_price: Price,
}

impl OrderLine {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Snapshot of the cart taken once at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPayload {
    pub lines: Vec<OrderLine>,
    pub total: Price,
}

impl OrderPayload {
    /// Snapshot `cart`. Returns `None` for an empty cart.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }
        let lines = cart
            .items()
            .iter()
            .map(|item| OrderLine {
                product_id: item.id.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.price,
            })
            .collect();
        Some(Self {
            lines,
            total: cart.total(),
        })
    }

    /// Item rows for the stored order `order_id`.
    #[must_use]
    pub fn order_items(&self, order_id: &OrderId) -> Vec<NewOrderItem> {
        self.lines
            .iter()
            .map(|line| NewOrderItem {
                order_id: order_id.clone(),
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect()
    }
}

/// Result of a completed checkout.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    /// The stored order row.
    pub order: OrderRecord,
    /// What was ordered.
    pub payload: OrderPayload,
    /// Summary sent to the seller.
    pub message: String,
    /// WhatsApp link carrying `message` to the seller.
    pub handoff_url: Url,
}

/// Checkout against an [`OrderBackend`].
#[derive(Debug)]
pub struct Checkout<'a, B> {
    backend: &'a B,
    seller_whatsapp: &'a str,
    order_hold: Duration,
}

impl<'a, B: OrderBackend> Checkout<'a, B> {
    /// Checkout handing off to `seller_whatsapp` (digits only).
    #[must_use]
    pub fn new(backend: &'a B, seller_whatsapp: &'a str) -> Self {
        Self {
            backend,
            seller_whatsapp,
            order_hold: Duration::days(DEFAULT_ORDER_HOLD_DAYS),
        }
    }

    /// Override how long an unpaid order is held.
    #[must_use]
    pub fn with_order_hold(mut self, order_hold: Duration) -> Self {
        self.order_hold = order_hold;
        self
    }

    /// Place the cart's order for `email` and clear the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] if the cart is empty, the customer is
    /// unknown, or the backend fails. The cart is unchanged on error.
    pub async fn run(
        &self,
        store: &mut CartStore,
        email: &Email,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        self.run_at(store, email, Utc::now()).await
    }

    /// [`Checkout::run`] with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`Checkout::run`].
    #[instrument(skip(self, store, email), fields(email = %email, lines = store.items().len()))]
    pub async fn run_at(
        &self,
        store: &mut CartStore,
        email: &Email,
        now: DateTime<Utc>,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let payload = OrderPayload::from_cart(store.cart()).ok_or(CheckoutError::EmptyCart)?;
        // The backend echoes the total back; it has to parse as a `Price`.
        if payload.total.amount() > Price::MAX_AMOUNT {
            return Err(CheckoutError::TotalTooLarge(payload.total));
        }

        let customer = match self.backend.find_customer(email).await {
            Ok(customer) => customer,
            Err(BackendError::NotFound(_)) => {
                warn!("checkout attempted without a customer profile");
                return Err(CheckoutError::CustomerNotFound(email.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let order = self
            .backend
            .create_order(&NewOrder {
                user_id: customer.id.clone(),
                total_price: payload.total,
                cancel_at: now + self.order_hold,
            })
            .await?;
        info!(order_id = %order.id, total = %payload.total, "order created");

        if let Err(e) = self
            .backend
            .insert_order_items(&payload.order_items(&order.id))
            .await
        {
            warn!(order_id = %order.id, error = %e, "order items not saved, order left pending");
            return Err(e.into());
        }

        let message = build_order_message(&customer, &order.id, &payload, now);
        let handoff_url = whatsapp_url(self.seller_whatsapp, &message)?;

        store.clear_cart();
        info!(order_id = %order.id, "checkout complete, cart cleared");

        Ok(CheckoutReceipt {
            order,
            payload,
            message,
            handoff_url,
        })
    }
}
