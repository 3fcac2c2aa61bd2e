//! Money value object for prices and totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::Quantity;
use crate::domain::shared::DomainError;

/// A monetary amount.
///
/// Represented as a Decimal so that `unit price × amount` is exact. Nothing
/// here rounds; storage keeps the decimal text as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a new Money value from a Decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money value from cents (integer).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Parse an exact decimal string such as `"10.00"`.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a decimal number.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        Decimal::from_str(text.trim())
            .map(Self)
            .map_err(|e| DomainError::InvalidValue {
                field: "money".to_string(),
                message: format!("'{text}' is not a decimal amount: {e}"),
            })
    }

    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Get the inner Decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if this amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiply a unit price by a quantity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Overflow` if the product does not fit in a Decimal.
    pub fn times(&self, quantity: Quantity) -> Result<Self, DomainError> {
        self.0
            .checked_mul(Decimal::from(quantity.value()))
            .map(Self)
            .ok_or_else(|| DomainError::Overflow {
                operation: format!("{} * {}", self.0, quantity),
            })
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}
