//! Quantity value object for ordered and moved amounts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// A whole number of product units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    /// Create a new Quantity.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Get the number of units.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Returns true if this quantity is positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check that the quantity can be moved into a warehouse.
    ///
    /// # Errors
    ///
    /// Returns error if the quantity is zero or negative.
    pub fn validate_for_fulfillment(&self) -> Result<(), DomainError> {
        if !self.is_positive() {
            return Err(DomainError::InvalidValue {
                field: "amount".to_string(),
                message: format!("Amount must be greater than 0 (got {})", self.0),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
