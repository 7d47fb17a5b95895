//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for front ends. Call
//! [`AppError::report`] once at the top level: it captures server-side
//! failures to Sentry and logs them before the front end shows
//! [`AppError::user_message`].

use thiserror::Error;

use crate::backend::BackendError;
use crate::cart::{Cart, CartError, CartEvent, CartObserver};
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A cart operation rejected its input.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Durable storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Order backend failed outside checkout.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// The named product or order does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Wrap a backend error from a lookup by id, so a missing row reads as
    /// the user's mistake rather than an outage.
    #[must_use]
    pub fn from_lookup(err: BackendError) -> Self {
        match err {
            BackendError::NotFound(what) => Self::NotFound(what),
            other => Self::Backend(other),
        }
    }

    /// Whether the failure is on our side rather than the user's.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Storage(_) | Self::Backend(_) => true,
            Self::Checkout(err) => matches!(
                err,
                CheckoutError::Backend(_) | CheckoutError::Handoff(_)
            ),
            Self::Config(_) | Self::Cart(_) | Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }

    /// Capture internal errors to Sentry and log every error.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command error"
            );
        } else {
            tracing::warn!(error = %self, "Command rejected");
        }
    }

    /// Message safe to show the shopper.
    // Don't expose internal error details to users
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) => "No se pudo guardar el carrito".to_string(),
            Self::Backend(_) => "Servicio externo no disponible".to_string(),
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => "Tu carrito está vacío".to_string(),
                CheckoutError::TotalTooLarge(total) => {
                    format!("El total del pedido ({total}) supera el máximo permitido")
                }
                CheckoutError::CustomerNotFound(_) => {
                    "No se pudo obtener los datos del cliente".to_string()
                }
                CheckoutError::Backend(_) => "Error al crear el pedido".to_string(),
                CheckoutError::Handoff(_) => "No se pudo abrir WhatsApp".to_string(),
            },
            Self::NotFound(what) => format!("No encontrado: {what}"),
            Self::Config(_) | Self::Cart(_) | Self::BadRequest(_) => self.to_string(),
        }
    }

    /// Process exit code: 2 for usage errors, 1 for everything else.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Cart(_) | Self::NotFound(_) | Self::BadRequest(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from the signed-in email.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

/// Cart observer leaving a Sentry breadcrumb per mutation.
#[derive(Debug, Default, Clone, Copy)]
pub struct BreadcrumbObserver;

impl CartObserver for BreadcrumbObserver {
    fn cart_changed(&mut self, event: &CartEvent, cart: &Cart) {
        let lines = cart.items().len().to_string();
        let total = cart.total().format_amount();
        let id = match event {
            CartEvent::Added { id, .. }
            | CartEvent::Increased { id, .. }
            | CartEvent::Decreased { id, .. }
            | CartEvent::Removed { id, .. } => id.as_str(),
            CartEvent::Cleared => "",
        };
        add_breadcrumb(
            "cart",
            event.name(),
            Some(&[("product_id", id), ("lines", &lines), ("total", &total)]),
        );
    }
}

#[cfg(test)]
mod tests {
    use bella_core::QuantityError;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("unknown product".to_string());
        assert_eq!(err.to_string(), "Bad request: unknown product");
    }

    #[test]
    fn test_internal_classification() {
        assert!(AppError::Storage(std::io::Error::other("x").into()).is_internal());
        assert!(AppError::Checkout(CheckoutError::Backend(BackendError::NotFound("x".into()))).is_internal());
        assert!(!AppError::Checkout(CheckoutError::EmptyCart).is_internal());
        assert!(!AppError::Cart(CartError::InvalidQuantity(QuantityError::NotPositive(0))).is_internal());
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = AppError::Checkout(CheckoutError::Backend(BackendError::Api {
            status: 500,
            message: "relation \"orders\" does not exist".to_string(),
        }));
        assert_eq!(err.user_message(), "Error al crear el pedido");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_usage_errors_exit_2() {
        let err = AppError::Config(ConfigError::MissingEnvVar("BACKEND_URL".to_string()));
        assert_eq!(err.exit_code(), 2);
        assert!(err.user_message().contains("BACKEND_URL"));
    }

    #[test]
    fn test_lookup_miss_is_user_error() {
        let err = AppError::from_lookup(BackendError::NotFound("product 9".to_string()));
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!err.is_internal());
        assert_eq!(err.user_message(), "No encontrado: product 9");
        assert_eq!(err.exit_code(), 2);

        let outage = AppError::from_lookup(BackendError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        });
        assert!(outage.is_internal());
        assert_eq!(outage.user_message(), "Servicio externo no disponible");
    }

    #[test]
    fn test_breadcrumb_observer_without_client() {
        // No Sentry client is bound in tests; breadcrumbs are dropped silently.
        let mut observer = BreadcrumbObserver;
        observer.cart_changed(&CartEvent::Cleared, &Cart::new());
    }
}
