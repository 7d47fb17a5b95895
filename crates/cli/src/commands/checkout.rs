//! Checkout command.

use bella_core::Email;
use bella_storefront::backend::RestBackend;
use bella_storefront::checkout::Checkout;
use bella_storefront::config::CheckoutConfig;
use bella_storefront::error::{AppError, Result, set_sentry_user};
use bella_storefront::state::Session;
use tracing::info;

use crate::output;

/// Place the cart's order for `email` and print the handoff link.
///
/// Backend settings are loaded here rather than at startup so cart commands
/// work without them.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for an invalid email, `AppError::Config`
/// if backend settings are missing, and `AppError::Checkout` if the order
/// cannot be placed. The cart is kept on every error.
pub async fn run(session: &mut Session, email: &str) -> Result<()> {
    let email = Email::parse(email).map_err(|e| AppError::BadRequest(format!("email: {e}")))?;
    set_sentry_user(email.as_str());

    let config = CheckoutConfig::from_env()?;
    let backend = RestBackend::new(&config.backend)?;

    let receipt = Checkout::new(&backend, &config.seller_whatsapp)
        .with_order_hold(config.order_hold())
        .run(session.cart_mut(), &email)
        .await?;

    info!(order_id = %receipt.order.id, "order placed");
    output::receipt(&receipt);
    Ok(())
}
