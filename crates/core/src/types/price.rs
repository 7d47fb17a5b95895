//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are held as [`Decimal`] so that cart totals are exact no matter how
//! many fractional amounts are accumulated. The shop sells in bolivianos only,
//! so a price carries no currency code.
//!
//! A price has at most two decimal places and never exceeds
//! [`Price::MAX_AMOUNT`]. Within those bounds a line total or cart total
//! cannot overflow, and every price survives a trip through a JSON number.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::quantity::Quantity;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price must not be negative (got {0})")]
    Negative(Decimal),
    /// The amount has more than two decimal places.
    #[error("price must have at most 2 decimal places (got {0})")]
    TooPrecise(Decimal),
    /// The amount is above [`Price::MAX_AMOUNT`].
    #[error("price must not exceed {max} (got {0})", max = Price::MAX_AMOUNT)]
    TooLarge(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// Decimal places a price may carry (centavos).
const MAX_SCALE: u32 = 2;

/// A non-negative amount in bolivianos.
///
/// Serializes as a JSON number. Deserializes from a JSON number or a decimal
/// string; numbers are converted through their shortest decimal rendering so
/// `0.1` reads back as exactly `0.1`.
///
/// ```
/// use bella_core::Price;
///
/// let price: Price = "12.5".parse().unwrap();
/// assert_eq!(price.to_string(), "Bs 12.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Currency symbol used when displaying prices.
    pub const SYMBOL: &'static str = "Bs";

    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest unit price accepted, in bolivianos.
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

    /// Create a price from a decimal amount.
    ///
    /// Trailing zeros are ignored, so `10.500` is accepted as `10.5`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero,
    /// [`PriceError::TooPrecise`] for more than two decimal places, and
    /// [`PriceError::TooLarge`] above [`Price::MAX_AMOUNT`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        let amount = amount.normalize();
        if amount.scale() > MAX_SCALE {
            return Err(PriceError::TooPrecise(amount));
        }
        if amount > Self::MAX_AMOUNT {
            return Err(PriceError::TooLarge(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in centavos (hundredths).
    ///
    /// Every `u32` is below [`Price::MAX_AMOUNT`] once divided by 100.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// Saturates instead of panicking, though bounded prices and quantities
    /// never get near the limit.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity.get())))
    }

    /// Amount rounded to two decimals, without the currency symbol.
    #[must_use]
    pub fn format_amount(&self) -> String {
        format!("{:.2}", self.0.round_dp(2))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", Self::SYMBOL, self.format_amount())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Add for Price {
    type Output = Self;

    // Sums are not bounded by `MAX_AMOUNT`, only by `Decimal` itself.
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => Err(serde::ser::Error::custom("price out of range")),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceVisitor;

        impl serde::de::Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative number or decimal string")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Price, E> {
                Price::new(Decimal::from(v)).map_err(E::custom)
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Price, E> {
                Price::new(Decimal::from(v)).map_err(E::custom)
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Price, E> {
                if !v.is_finite() {
                    return Err(E::custom("price must be finite"));
                }
                // `f64` displays as its shortest round-trip representation.
                v.to_string().parse().map_err(E::custom)
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Price, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}
