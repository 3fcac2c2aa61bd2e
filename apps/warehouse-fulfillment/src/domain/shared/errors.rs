//! Domain errors for the fulfillment engine.

use std::fmt;

/// Domain-level errors that can occur in business logic.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Arithmetic left the representable range.
    Overflow {
        /// Operation that overflowed.
        operation: String,
    },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::Overflow { operation } => {
                write!(f, "Arithmetic overflow in {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
