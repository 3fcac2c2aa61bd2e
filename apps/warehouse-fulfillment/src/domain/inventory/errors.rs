//! Inventory errors.

use std::fmt;

use super::value_objects::OrderStatus;
use crate::domain::shared::{DomainError, OrderId};

/// Errors raised by the inventory aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// The order already left the `Pending` state.
    AlreadyFulfilled {
        /// Order ID.
        order_id: OrderId,
    },

    /// A stock movement can only be recorded for a fulfilled order.
    OrderNotFulfilled {
        /// Order ID.
        order_id: OrderId,
        /// Current status.
        status: OrderStatus,
    },

    /// Total price could not be computed.
    Pricing(DomainError),
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyFulfilled { order_id } => {
                write!(f, "Order {order_id} has already been fulfilled")
            }
            Self::OrderNotFulfilled { order_id, status } => {
                write!(
                    f,
                    "Cannot record stock movement for order {order_id} in status {status}"
                )
            }
            Self::Pricing(err) => write!(f, "Pricing failed: {err}"),
        }
    }
}

impl std::error::Error for InventoryError {}

impl From<DomainError> for InventoryError {
    fn from(err: DomainError) -> Self {
        Self::Pricing(err)
    }
}
