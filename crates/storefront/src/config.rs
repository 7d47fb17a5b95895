//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Cart (all optional)
//! - `CART_STORAGE_DIR` - Directory holding the durable cart slot (default: `.bella`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! ## Backend (catalog, checkout and orders)
//! - `BACKEND_URL` - Base URL of the backend (required)
//! - `BACKEND_API_KEY` - Backend project API key (required)
//!
//! ## Checkout
//! - `SELLER_WHATSAPP` - Seller phone in international format, e.g. `59171234567` (required)
//! - `ORDER_HOLD_DAYS` - Days before an unpaid order is cancelled (default: 2)

use std::collections::HashMap;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_CART_STORAGE_DIR: &str = ".bella";
const MAX_ORDER_HOLD_DAYS: u32 = 30;
const MIN_API_KEY_LENGTH: usize = 20;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Settings every storefront session needs.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory the durable cart slot lives in
    pub cart_storage_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Settings needed only to check out.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Order backend connection
    pub backend: BackendConfig,
    /// Seller phone number, digits only, international format
    pub seller_whatsapp: String,
    /// Days before an unpaid order is cancelled
    pub order_hold_days: u32,
}

/// Backend connection settings.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL, always ending in `/`
    pub url: Url,
    /// Project API key
    pub api_key: SecretString,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Currently infallible; returns `Result` so new required settings do not
    /// change the signature.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            cart_storage_dir: PathBuf::from(get_env_or_default(
                "CART_STORAGE_DIR",
                DEFAULT_CART_STORAGE_DIR,
            )),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

impl BackendConfig {
    /// Load the backend connection from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `BACKEND_URL` or `BACKEND_API_KEY` is missing
    /// or invalid, or if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            url: parse_backend_url(&get_required_env("BACKEND_URL")?)?,
            api_key: get_validated_secret("BACKEND_API_KEY")?,
        })
    }
}

impl CheckoutConfig {
    /// Load checkout configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = BackendConfig::from_env()?;
        let seller_whatsapp = parse_phone(&get_required_env("SELLER_WHATSAPP")?)
            .map_err(|e| ConfigError::InvalidEnvVar("SELLER_WHATSAPP".to_string(), e))?;
        let order_hold_days = parse_hold_days(&get_env_or_default(
            "ORDER_HOLD_DAYS",
            &crate::checkout::DEFAULT_ORDER_HOLD_DAYS.to_string(),
        ))?;

        Ok(Self {
            backend,
            seller_whatsapp,
            order_hold_days,
        })
    }

    /// Hold period as a duration.
    #[must_use]
    pub fn order_hold(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.order_hold_days))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse the backend base URL, normalizing it to end in `/` so table paths
/// join underneath it.
fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("BACKEND_URL".to_string(), msg);

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Normalize a WhatsApp number: drop `+`, spaces and dashes, then require
/// 8 to 15 digits.
fn parse_phone(raw: &str) -> Result<String, String> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '+' | ' ' | '-'))
        .collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("'{raw}' must contain only digits"));
    }
    if !(8..=15).contains(&digits.len()) {
        return Err(format!("'{raw}' must have 8 to 15 digits"));
    }
    Ok(digits)
}

fn parse_hold_days(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("ORDER_HOLD_DAYS".to_string(), msg);

    let days = raw.trim().parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if days == 0 || days > MAX_ORDER_HOLD_DAYS {
        return Err(invalid(format!("must be between 1 and {MAX_ORDER_HOLD_DAYS}")));
    }
    Ok(days)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is long enough, not a placeholder, and has
/// sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let insecure = |msg: String| ConfigError::InsecureSecret(var_name.to_string(), msg);

    if secret.len() < MIN_API_KEY_LENGTH {
        return Err(insecure(format!(
            "must be at least {MIN_API_KEY_LENGTH} characters (got {})",
            secret.len()
        )));
    }

    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(insecure(format!(
            "appears to be a placeholder (contains '{pattern}')"
        )));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(insecure(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        )));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
