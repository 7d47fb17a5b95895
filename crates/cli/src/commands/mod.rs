//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;

use bella_storefront::backend::RestBackend;
use bella_storefront::config::BackendConfig;
use bella_storefront::error::Result;

/// Backend client from the environment.
///
/// Loaded per command so cart-only commands work without backend settings.
fn backend() -> Result<RestBackend> {
    let config = BackendConfig::from_env()?;
    Ok(RestBackend::new(&config)?)
}
