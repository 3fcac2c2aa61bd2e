//! Boundary error model for the fulfillment engine.
//!
//! Maps fulfillment failures onto stable codes and HTTP statuses for whatever
//! transport sits in front of the engine.
//!
//! | Code | HTTP | Usage |
//! |------|------|-------|
//! | `INVALID_INPUT` | 400 | Malformed request |
//! | `PRODUCT_NOT_FOUND` | 404 | Unknown product |
//! | `WAREHOUSE_NOT_FOUND` | 404 | Unknown warehouse |
//! | `NO_MATCHING_ORDER` | 400 | No order fits the request |
//! | `ORDER_ALREADY_FULFILLED` | 409 | Order was fulfilled before |
//! | `STORAGE_UNAVAILABLE` | 503 | Storage busy or unreachable |
//! | `INTERNAL_ERROR` | 500 | Unexpected server error |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::{FulfillmentError, MissingEntity};

/// Error codes for the fulfillment engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed request.
    InvalidInput,
    /// Unknown product.
    ProductNotFound,
    /// Unknown warehouse.
    WarehouseNotFound,
    /// No order matches the request.
    NoMatchingOrder,
    /// The matched order was already fulfilled.
    OrderAlreadyFulfilled,
    /// Storage busy, locked, or unreachable.
    StorageUnavailable,
    /// Unexpected server error.
    InternalError,
}

impl ErrorCode {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::NoMatchingOrder => 400,
            Self::ProductNotFound | Self::WarehouseNotFound => 404,
            Self::OrderAlreadyFulfilled => 409,
            Self::StorageUnavailable => 503,
            Self::InternalError => 500,
        }
    }

    /// Error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::WarehouseNotFound => "WAREHOUSE_NOT_FOUND",
            Self::NoMatchingOrder => "NO_MATCHING_ORDER",
            Self::OrderAlreadyFulfilled => "ORDER_ALREADY_FULFILLED",
            Self::StorageUnavailable => "STORAGE_UNAVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A coded error with context, ready for a transport.
#[derive(Debug, Clone, Error)]
pub struct ServiceError {
    code: ErrorCode,
    message: String,
    context: Vec<(String, String)>,
}

impl ServiceError {
    /// Create a new service error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Convert to an HTTP-compatible error response.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            status: self.code.http_status(),
            details: self.context.iter().cloned().collect(),
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

impl From<&FulfillmentError> for ServiceError {
    fn from(err: &FulfillmentError) -> Self {
        let error = Self::new(err.error_code(), err.to_string());
        match err {
            FulfillmentError::InvalidInput { field, .. } => error.with_context("field", field),
            FulfillmentError::NotFound(MissingEntity::Product(id)) => {
                error.with_context("product_id", id.to_string())
            }
            FulfillmentError::NotFound(MissingEntity::Warehouse(id)) => {
                error.with_context("warehouse_id", id.to_string())
            }
            FulfillmentError::NoMatchingOrder {
                product_id, amount, ..
            } => error
                .with_context("product_id", product_id.to_string())
                .with_context("amount", amount.to_string()),
            FulfillmentError::Transient(_) => error.with_context("retryable", "true"),
            FulfillmentError::Conflict { .. } | FulfillmentError::Internal(_) => error,
        }
    }
}

impl From<FulfillmentError> for ServiceError {
    fn from(err: FulfillmentError) -> Self {
        Self::from(&err)
    }
}

/// HTTP-compatible error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// HTTP status code.
    pub status: u16,
    /// Additional details.
    pub details: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::{ProductId, Quantity, Timestamp, WarehouseId};
    use test_case::test_case;

    #[test_case(ErrorCode::InvalidInput, 400)]
    #[test_case(ErrorCode::ProductNotFound, 404)]
    #[test_case(ErrorCode::WarehouseNotFound, 404)]
    #[test_case(ErrorCode::NoMatchingOrder, 400)]
    #[test_case(ErrorCode::OrderAlreadyFulfilled, 409)]
    #[test_case(ErrorCode::StorageUnavailable, 503)]
    #[test_case(ErrorCode::InternalError, 500)]
    fn http_status_mapping(code: ErrorCode, status: u16) {
        assert_eq!(code.http_status(), status);
    }

    #[test]
    fn reason_matches_serde_name() {
        let json = serde_json::to_string(&ErrorCode::OrderAlreadyFulfilled).unwrap();
        assert_eq!(json, format!("\"{}\"", ErrorCode::OrderAlreadyFulfilled.reason()));
    }

    #[test]
    fn service_error_creation() {
        let error = ServiceError::new(ErrorCode::InvalidInput, "Bad request")
            .with_context("field", "amount")
            .with_context("value", "0");

        assert_eq!(error.code(), ErrorCode::InvalidInput);
        assert_eq!(error.message(), "Bad request");
        assert_eq!(error.context().len(), 2);
        assert_eq!(error.to_string(), "[INVALID_INPUT] Bad request");
    }

    #[test]
    fn warehouse_not_found_response() {
        let err = FulfillmentError::NotFound(MissingEntity::Warehouse(WarehouseId::new(7)));
        let response = ServiceError::from(&err).to_http_response();

        assert_eq!(response.code, "WAREHOUSE_NOT_FOUND");
        assert_eq!(response.status, 404);
        assert_eq!(response.details.get("warehouse_id").map(String::as_str), Some("7"));
    }

    #[test]
    fn no_matching_order_response() {
        let err = FulfillmentError::NoMatchingOrder {
            product_id: ProductId::new(1),
            amount: Quantity::new(3),
            requested_at: Timestamp::now(),
        };
        let response = ServiceError::from(err).to_http_response();

        assert_eq!(response.status, 400);
        assert_eq!(response.details.get("amount").map(String::as_str), Some("3"));
    }

    #[test]
    fn conflict_response() {
        let err = FulfillmentError::Conflict {
            reason: "order 5 already has a stock movement".to_string(),
        };
        let response = ServiceError::from(&err).to_http_response();

        assert_eq!(response.code, "ORDER_ALREADY_FULFILLED");
        assert_eq!(response.status, 409);
    }
}
