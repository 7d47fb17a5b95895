//! Client-side shopping cart.
//!
//! # Structure
//!
//! - [`Cart`] - the line items and the pure operations on them
//! - [`CartStore`] - owns a [`Cart`], applies mutations and notifies observers
//! - [`CartObserver`] - hook run after every mutation
//! - [`PersistObserver`] - observer that writes the cart to a durable slot
//!
//! Every mutation goes through the same pipeline: the store changes the
//! [`Cart`], then hands a [`CartEvent`] and the new state to each observer in
//! registration order. Persistence is one such observer, so a store built
//! with [`CartStore::new`] never touches storage at all.

mod observer;
mod persist;
mod state;
mod store;

pub use observer::{CartEvent, CartObserver};
pub use persist::{CART_STORAGE_KEY, PersistObserver, load_cart};
pub use state::{Cart, LineItem};
pub use store::CartStore;

use thiserror::Error;

use bella_core::{ProductId, QuantityError};

/// Errors raised by cart operations that validate their input.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is not a positive integer.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// A product id appears on more than one line.
    #[error("duplicate line for product {0}")]
    DuplicateProduct(ProductId),
}
