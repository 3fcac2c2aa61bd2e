//! Application-level fulfillment errors.

use std::fmt;

use thiserror::Error;

use crate::application::ports::StorageError;
use crate::domain::inventory::InventoryError;
use crate::domain::shared::{DomainError, ProductId, Quantity, Timestamp, WarehouseId};
use crate::error::ErrorCode;

/// Entity a request referred to that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingEntity {
    /// Unknown product.
    Product(ProductId),
    /// Unknown warehouse.
    Warehouse(WarehouseId),
}

impl fmt::Display for MissingEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Product(id) => write!(f, "Product {id}"),
            Self::Warehouse(id) => write!(f, "Warehouse {id}"),
        }
    }
}

/// Fulfillment failure. Every variant is reported only after rollback.
#[derive(Debug, Clone, Error)]
pub enum FulfillmentError {
    /// Malformed request; nothing was read from storage.
    #[error("Invalid {field}: {message}")]
    InvalidInput {
        /// Offending field (wire name).
        field: String,
        /// Reason.
        message: String,
    },

    /// Referenced product or warehouse does not exist.
    #[error("{0} not found")]
    NotFound(MissingEntity),

    /// No order satisfies the request.
    #[error("No order for product {product_id} with amount {amount} created before {requested_at}")]
    NoMatchingOrder {
        /// Requested product.
        product_id: ProductId,
        /// Requested amount.
        amount: Quantity,
        /// Request time.
        requested_at: Timestamp,
    },

    /// The matched order has already been fulfilled.
    #[error("Order already fulfilled: {reason}")]
    Conflict {
        /// What detected the conflict.
        reason: String,
    },

    /// Storage was busy or unreachable; retrying may succeed.
    #[error("Storage unavailable: {0}")]
    Transient(String),

    /// Unexpected failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FulfillmentError {
    /// Stable error code for boundary layers.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { .. } => ErrorCode::InvalidInput,
            Self::NotFound(MissingEntity::Product(_)) => ErrorCode::ProductNotFound,
            Self::NotFound(MissingEntity::Warehouse(_)) => ErrorCode::WarehouseNotFound,
            Self::NoMatchingOrder { .. } => ErrorCode::NoMatchingOrder,
            Self::Conflict { .. } => ErrorCode::OrderAlreadyFulfilled,
            Self::Transient(_) => ErrorCode::StorageUnavailable,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Metric label for the outcome.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::NoMatchingOrder { .. } => "no_matching_order",
            Self::Conflict { .. } => "conflict",
            Self::Transient(_) => "transient",
            Self::Internal(_) => "internal",
        }
    }

    /// Returns true if the same request may succeed later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<StorageError> for FulfillmentError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation(msg) => Self::Conflict { reason: msg },
            StorageError::Busy(_) | StorageError::Timeout(_) | StorageError::Connection(_) => {
                Self::Transient(err.to_string())
            }
            StorageError::Query(_) | StorageError::Integrity(_) | StorageError::Serialization(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<InventoryError> for FulfillmentError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::AlreadyFulfilled { .. } => Self::Conflict {
                reason: err.to_string(),
            },
            InventoryError::OrderNotFulfilled { .. } | InventoryError::Pricing(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<DomainError> for FulfillmentError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidValue { field, message } => Self::InvalidInput { field, message },
            DomainError::Overflow { .. } => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::OrderId;
    use test_case::test_case;

    #[test_case(StorageError::UniqueViolation("x".into()), "conflict")]
    #[test_case(StorageError::Busy("x".into()), "transient")]
    #[test_case(StorageError::Timeout("x".into()), "transient")]
    #[test_case(StorageError::Connection("x".into()), "transient")]
    #[test_case(StorageError::Query("x".into()), "internal")]
    #[test_case(StorageError::Integrity("x".into()), "internal")]
    #[test_case(StorageError::Serialization("x".into()), "internal")]
    fn storage_errors_map_to_outcomes(err: StorageError, outcome: &str) {
        assert_eq!(FulfillmentError::from(err).outcome(), outcome);
    }

    #[test]
    fn not_found_codes_distinguish_entities() {
        let product = FulfillmentError::NotFound(MissingEntity::Product(ProductId::new(1)));
        let warehouse = FulfillmentError::NotFound(MissingEntity::Warehouse(WarehouseId::new(1)));

        assert_eq!(product.error_code(), ErrorCode::ProductNotFound);
        assert_eq!(warehouse.error_code(), ErrorCode::WarehouseNotFound);
        assert_eq!(product.to_string(), "Product 1 not found");
    }

    #[test]
    fn already_fulfilled_is_conflict() {
        let err: FulfillmentError = InventoryError::AlreadyFulfilled {
            order_id: OrderId::new(5),
        }
        .into();
        assert!(matches!(err, FulfillmentError::Conflict { .. }));
        assert_eq!(err.error_code(), ErrorCode::OrderAlreadyFulfilled);
    }

    #[test]
    fn invalid_value_keeps_field() {
        let err: FulfillmentError = DomainError::InvalidValue {
            field: "amount".to_string(),
            message: "must be positive".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            FulfillmentError::InvalidInput { ref field, .. } if field == "amount"
        ));
    }

    #[test]
    fn only_transient_is_retryable() {
        assert!(FulfillmentError::Transient("busy".into()).is_retryable());
        assert!(!FulfillmentError::Internal("boom".into()).is_retryable());
    }
}
