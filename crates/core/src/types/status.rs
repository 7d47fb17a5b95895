//! Order status values as stored by the order backend.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an order.
///
/// New orders start as [`OrderStatus::Pending`]; the seller marks them
/// completed once paid, or cancelled. Unpaid orders are cancelled after their
/// hold period expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "completado")]
    Completed,
    #[serde(rename = "anulado")]
    Cancelled,
}

impl OrderStatus {
    /// The backend's string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Completed => "completado",
            Self::Cancelled => "anulado",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(Self::Pending),
            "completado" => Ok(Self::Completed),
            "anulado" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}
