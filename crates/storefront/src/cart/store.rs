//! The cart store: state plus the mutation pipeline.

use std::fmt;

use tracing::debug;

use bella_core::{Price, Product, ProductId, Quantity};

use crate::storage::DurableSlot;

use super::CartError;
use super::observer::{CartEvent, CartObserver};
use super::persist::{CART_STORAGE_KEY, PersistObserver, load_cart};
use super::state::{Cart, LineItem};

/// The authoritative client-side cart.
///
/// One store is created per shopping session and passed to whatever needs
/// the cart. Mutators take `&mut self` and never fail; each one applies its
/// change, then notifies every registered [`CartObserver`] before returning.
///
/// ```
/// use bella_core::{Price, Product, Quantity};
/// use bella_storefront::cart::CartStore;
/// use bella_storefront::storage::MemorySlot;
///
/// let slot = MemorySlot::new();
/// let mut store = CartStore::open(slot.clone());
/// store.add_to_cart(Product::new("A", "Labial", Price::from_cents(1000)), Quantity::ONE);
///
/// // A later session over the same storage sees the same cart.
/// let reopened = CartStore::open(slot);
/// assert_eq!(reopened.total(), Price::from_cents(1000));
/// ```
#[derive(Default)]
pub struct CartStore {
    cart: Cart,
    observers: Vec<Box<dyn CartObserver>>,
    source: Option<Source>,
}

/// Where [`CartStore::reload`] reads from.
struct Source {
    slot: Box<dyn DurableSlot>,
    key: String,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("observers", &self.observers.len())
            .field("source", &self.source.as_ref().map(|s| s.key.as_str()))
            .finish()
    }
}

impl CartStore {
    /// An empty, unpersisted store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An unpersisted store starting from `cart`.
    #[must_use]
    pub fn from_cart(cart: Cart) -> Self {
        Self {
            cart,
            ..Self::default()
        }
    }

    /// Load the cart from `slot` under [`CART_STORAGE_KEY`] and persist every
    /// later mutation back to it.
    #[must_use]
    pub fn open<S>(slot: S) -> Self
    where
        S: DurableSlot + Clone + 'static,
    {
        Self::open_with_key(slot, CART_STORAGE_KEY)
    }

    /// Like [`CartStore::open`] with a custom slot key.
    #[must_use]
    pub fn open_with_key<S>(slot: S, key: &str) -> Self
    where
        S: DurableSlot + Clone + 'static,
    {
        let cart = load_cart(&slot, key);
        let mut store = Self::from_cart(cart);
        store.observe(PersistObserver::with_key(slot.clone(), key));
        store.source = Some(Source {
            slot: Box::new(slot),
            key: key.to_owned(),
        });
        store
    }

    /// Register an observer. Observers run in registration order.
    pub fn observe(&mut self, observer: impl CartObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Builder form of [`CartStore::observe`].
    #[must_use]
    pub fn with_observer(mut self, observer: impl CartObserver + 'static) -> Self {
        self.observe(observer);
        self
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The lines in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.cart.get(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Sum of unit price times quantity over all lines; zero when empty.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Add `quantity` units of `product`. Adding a product already in the
    /// cart increases that line's quantity.
    pub fn add_to_cart(&mut self, product: Product, quantity: Quantity) {
        let id = product.id.clone();
        self.cart.add(product, quantity);
        self.notify(&CartEvent::Added { id, quantity });
    }

    /// [`CartStore::add_to_cart`] for callers holding a raw integer.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for `0` or anything above
    /// [`Quantity::MAX`]; the cart is untouched.
    pub fn try_add_to_cart(&mut self, product: Product, quantity: u32) -> Result<(), CartError> {
        let quantity = Quantity::new(quantity)?;
        self.add_to_cart(product, quantity);
        Ok(())
    }

    /// One more unit of `id`; no-op if it is not in the cart.
    pub fn increase(&mut self, id: &ProductId) {
        let matched = self.cart.increase(id);
        self.notify(&CartEvent::Increased {
            id: id.clone(),
            matched,
        });
    }

    /// One fewer unit of `id`, never below one; no-op if it is not in the cart.
    pub fn decrease(&mut self, id: &ProductId) {
        let matched = self.cart.decrease(id);
        self.notify(&CartEvent::Decreased {
            id: id.clone(),
            matched,
        });
    }

    /// Drop the line for `id`; no-op if it is not in the cart.
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        let matched = self.cart.remove(id);
        self.notify(&CartEvent::Removed {
            id: id.clone(),
            matched,
        });
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.notify(&CartEvent::Cleared);
    }

    /// Replace the in-memory cart with what the slot currently holds.
    ///
    /// Used when another writer may have changed the slot. Observers are not
    /// notified. Returns `false` for a store that was not opened over a slot.
    pub fn reload(&mut self) -> bool {
        let Some(source) = &self.source else {
            return false;
        };
        self.cart = load_cart(source.slot.as_ref(), &source.key);
        debug!(lines = self.cart.items().len(), "cart reloaded");
        true
    }

    fn notify(&mut self, event: &CartEvent) {
        debug!(
            event = event.name(),
            lines = self.cart.items().len(),
            total = %self.cart.total(),
            "cart mutated"
        );
        for observer in &mut self.observers {
            observer.cart_changed(event, &self.cart);
        }
    }
}
