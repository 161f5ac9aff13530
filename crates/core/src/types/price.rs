//! Type-safe price representation using decimal arithmetic.
//!
//! The backend sends prices and order totals as JSON numbers, but older
//! records sometimes carry them as strings. [`Price`] accepts both on the way
//! in and always writes a JSON number on the way out.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a price typed by a user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// Input was not a decimal number.
    #[error("not a number: {0}")]
    NotANumber(String),

    /// Input was negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A monetary amount in the store's currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(serialize_with = "rust_decimal::serde::float::serialize")] Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let amount = Decimal::from_str(trimmed)
            .map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount.normalize()))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_accepts_number_and_string() {
        let from_number: Price = serde_json::from_str("9.99").unwrap();
        let from_string: Price = serde_json::from_str("\"9.99\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.amount(), Decimal::new(999, 2));
    }

    #[test]
    fn test_price_serializes_as_number() {
        let price: Price = "9.99".parse().unwrap();
        assert_eq!(serde_json::to_value(price).unwrap(), serde_json::json!(9.99));
    }

    #[test]
    fn test_price_parse_rejects_garbage_and_negatives() {
        assert_eq!(
            "abc".parse::<Price>(),
            Err(PriceError::NotANumber("abc".to_string()))
        );
        assert_eq!("-1".parse::<Price>(), Err(PriceError::Negative));
        assert!("0".parse::<Price>().is_ok());
    }

    #[test]
    fn test_price_display_has_two_decimals() {
        let price: Price = "5".parse().unwrap();
        assert_eq!(price.to_string(), "5.00");
    }
}
