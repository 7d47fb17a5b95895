//! Writing the cart to, and reading it back from, a durable slot.

use tracing::{debug, warn};

use crate::storage::{DurableSlot, StorageError};

use super::observer::{CartEvent, CartObserver};
use super::state::Cart;

/// Slot key the cart is stored under.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Read the cart stored under `key`.
///
/// An absent, unreadable or malformed value yields an empty cart. Failures are
/// logged and never returned.
pub fn load_cart<S: DurableSlot + ?Sized>(slot: &S, key: &str) -> Cart {
    let raw = match slot.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "no stored cart, starting empty");
            return Cart::new();
        }
        Err(e) => {
            warn!(key, error = %e, "failed to read stored cart, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(cart) => {
            debug!(key, lines = cart.items().len(), "stored cart loaded");
            cart
        }
        Err(e) => {
            warn!(key, error = %e, "stored cart is malformed, starting empty");
            Cart::new()
        }
    }
}

/// Observer that serializes the whole cart into a slot after each mutation.
#[derive(Debug)]
pub struct PersistObserver<S> {
    slot: S,
    key: String,
    failures: u64,
}

impl<S: DurableSlot> PersistObserver<S> {
    /// Persist under [`CART_STORAGE_KEY`].
    #[must_use]
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, CART_STORAGE_KEY)
    }

    #[must_use]
    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
            failures: 0,
        }
    }

    /// Serialize `cart` and write it to the slot.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if encoding or the write fails.
    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let json = serde_json::to_string(cart)?;
        self.slot.write(&self.key, &json)
    }

    /// Number of writes that failed so far.
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.failures
    }
}

impl<S: DurableSlot> CartObserver for PersistObserver<S> {
    fn cart_changed(&mut self, event: &CartEvent, cart: &Cart) {
        if let Err(e) = self.save(cart) {
            self.failures += 1;
            warn!(
                key = %self.key,
                event = event.name(),
                error = %e,
                "failed to persist cart"
            );
        }
    }
}
