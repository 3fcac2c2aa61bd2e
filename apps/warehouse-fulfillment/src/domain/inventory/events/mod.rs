//! Domain events for inventory movements.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{
    Money, OrderId, ProductId, Quantity, StockMovementId, Timestamp, WarehouseId,
};

/// All inventory events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryEvent {
    /// An order moved from `Pending` to `Fulfilled`.
    OrderFulfilled(OrderFulfilled),
    /// A stock movement was persisted.
    StockMovementRecorded(StockMovementRecorded),
}

impl InventoryEvent {
    /// Order the event refers to.
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        match self {
            Self::OrderFulfilled(e) => e.order_id,
            Self::StockMovementRecorded(e) => e.order_id,
        }
    }

    /// When the event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> Timestamp {
        match self {
            Self::OrderFulfilled(e) => e.occurred_at,
            Self::StockMovementRecorded(e) => e.occurred_at,
        }
    }

    /// Event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::OrderFulfilled(_) => "ORDER_FULFILLED",
            Self::StockMovementRecorded(_) => "STOCK_MOVEMENT_RECORDED",
        }
    }
}

/// Order fulfilled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFulfilled {
    /// Order ID.
    pub order_id: OrderId,
    /// Product moved.
    pub product_id: ProductId,
    /// Amount moved.
    pub amount: Quantity,
    /// Fulfillment time.
    pub occurred_at: Timestamp,
}

/// Stock movement recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovementRecorded {
    /// Generated movement ID.
    pub movement_id: StockMovementId,
    /// Order satisfied by the movement.
    pub order_id: OrderId,
    /// Destination warehouse.
    pub warehouse_id: WarehouseId,
    /// Total price.
    pub total_price: Money,
    /// Movement time.
    pub occurred_at: Timestamp,
}
