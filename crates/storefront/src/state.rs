//! Shopper session state shared across commands.

use crate::cart::CartStore;
use crate::config::StorefrontConfig;
use crate::error::BreadcrumbObserver;
use crate::storage::FileSlot;

/// One shopper's storefront session.
///
/// Owns the cart store, opened over the durable slot named by the
/// configuration, so every mutation made through [`Session::cart_mut`] is
/// persisted before the call returns.
#[derive(Debug)]
pub struct Session {
    config: StorefrontConfig,
    cart: CartStore,
}

impl Session {
    /// Open a session, restoring the cart saved by the previous one.
    #[must_use]
    pub fn open(config: StorefrontConfig) -> Self {
        let slot = FileSlot::new(config.cart_storage_dir.clone());
        let cart = CartStore::open(slot).with_observer(BreadcrumbObserver);
        tracing::debug!(
            dir = %config.cart_storage_dir.display(),
            lines = cart.items().len(),
            "session opened"
        );
        Self { config, cart }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Get a mutable reference to the cart store.
    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bella_core::{Price, Product, Quantity};

    use super::*;

    fn config(dir: &std::path::Path) -> StorefrontConfig {
        StorefrontConfig {
            cart_storage_dir: dir.to_path_buf(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_session_restores_cart() {
        let dir = tempfile::tempdir().unwrap();

        let mut session = Session::open(config(dir.path()));
        assert!(session.cart().is_empty());
        session.cart_mut().add_to_cart(
            Product::new("p1", "Delineador", Price::from_cents(2500)),
            Quantity::new(3).unwrap(),
        );
        drop(session);

        let session = Session::open(config(dir.path()));
        assert_eq!(session.cart().item_count(), 3);
        assert_eq!(session.cart().total(), Price::from_cents(7500));
        assert_eq!(session.config().cart_storage_dir, dir.path());
    }
}
