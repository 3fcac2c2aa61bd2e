//! Fulfillment DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::use_cases::{FulfillOrderCommand, FulfillmentReceipt};
use crate::domain::shared::{ProductId, Quantity, WarehouseId};

/// Fulfillment request as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillOrderRequestDto {
    /// Product ID.
    pub product_id: i64,
    /// Warehouse ID.
    pub warehouse_id: i64,
    /// Amount to move.
    pub amount: i64,
    /// Request time; matched orders must be strictly older.
    pub created_at: DateTime<Utc>,
}

impl FulfillOrderRequestDto {
    /// Convert into a use case command.
    #[must_use]
    pub fn to_command(&self) -> FulfillOrderCommand {
        FulfillOrderCommand {
            product_id: ProductId::new(self.product_id),
            warehouse_id: WarehouseId::new(self.warehouse_id),
            amount: Quantity::new(self.amount),
            requested_at: self.created_at.into(),
        }
    }
}

/// Fulfillment response: the new stock movement ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillOrderResponseDto {
    /// Stock movement ID.
    pub id: i64,
}

impl From<&FulfillmentReceipt> for FulfillOrderResponseDto {
    fn from(receipt: &FulfillmentReceipt) -> Self {
        Self {
            id: receipt.movement_id.value(),
        }
    }
}
