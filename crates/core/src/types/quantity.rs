//! Line-item quantity.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities start at one.
    #[error("quantity must be at least 1 (got {0})")]
    NotPositive(i64),
    /// More units than one line may hold.
    #[error("quantity must not exceed {max} (got {0})", max = MAX_UNITS)]
    TooLarge(i64),
}

/// Units a single line may hold.
const MAX_UNITS: u32 = 10_000;

/// A positive number of units.
///
/// A line item can never hold zero units: the type cannot represent it, and
/// [`Quantity::decremented`] stops at one. Arithmetic saturates at
/// [`Quantity::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// The most units a line may hold.
    pub const MAX: Self = Self(NonZeroU32::MIN.saturating_add(MAX_UNITS - 1));

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotPositive`] for `0` and
    /// [`QuantityError::TooLarge`] above [`Quantity::MAX`].
    pub fn new(value: u32) -> Result<Self, QuantityError> {
        if value > MAX_UNITS {
            return Err(QuantityError::TooLarge(i64::from(value)));
        }
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(QuantityError::NotPositive(0))
    }

    /// The number of units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// `self + other`, saturating at [`Quantity::MAX`].
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        let sum = self.0.saturating_add(other.0.get());
        if sum.get() > MAX_UNITS {
            Self::MAX
        } else {
            Self(sum)
        }
    }

    /// One more unit, saturating.
    #[must_use]
    pub const fn incremented(self) -> Self {
        self.saturating_add(Self::ONE)
    }

    /// One fewer unit, never below one.
    #[must_use]
    pub fn decremented(self) -> Self {
        NonZeroU32::new(self.0.get() - 1).map_or(Self::ONE, Self)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 1 {
            return Err(QuantityError::NotPositive(value));
        }
        let value = u32::try_from(value).map_err(|_| QuantityError::TooLarge(value))?;
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}
