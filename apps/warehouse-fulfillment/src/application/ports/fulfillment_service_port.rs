//! Fulfillment Service Port (Driver Port)
//!
//! Entry point used by boundary layers. Any implementation with the same
//! contract (for example one backed by a database procedure) can stand in for
//! the provided use case.

use async_trait::async_trait;

use crate::application::dto::{FulfillOrderRequestDto, FulfillOrderResponseDto};
use crate::application::errors::FulfillmentError;

/// Fulfil one order, exactly once.
#[async_trait]
pub trait FulfillmentService: Send + Sync {
    /// Record the stock movement for the order matching `request`.
    async fn fulfill(
        &self,
        request: FulfillOrderRequestDto,
    ) -> Result<FulfillOrderResponseDto, FulfillmentError>;
}
