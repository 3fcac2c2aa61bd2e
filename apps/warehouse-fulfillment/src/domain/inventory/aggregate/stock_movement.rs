//! Stock movement records.
//!
//! A movement is written once per order and never modified.

use serde::{Deserialize, Serialize};

use super::Order;
use crate::domain::inventory::errors::InventoryError;
use crate::domain::inventory::events::{InventoryEvent, StockMovementRecorded};
use crate::domain::inventory::value_objects::OrderStatus;
use crate::domain::shared::{
    Money, OrderId, ProductId, Quantity, StockMovementId, Timestamp, WarehouseId,
};

/// A movement that has been priced but not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStockMovement {
    /// Destination warehouse.
    pub warehouse_id: WarehouseId,
    /// Product moved.
    pub product_id: ProductId,
    /// Order satisfied.
    pub order_id: OrderId,
    /// Amount moved.
    pub amount: Quantity,
    /// `unit_price * amount`, exact.
    pub total_price: Money,
    /// Movement time; equals the order's fulfillment time.
    pub created_at: Timestamp,
}

impl NewStockMovement {
    /// Price a movement for a fulfilled order.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFulfilled` if the order is still pending, or
    /// `Pricing` if the total overflows.
    pub fn record(
        order: &Order,
        warehouse_id: WarehouseId,
        unit_price: Money,
    ) -> Result<Self, InventoryError> {
        let Some(fulfilled_at) = order.fulfilled_at() else {
            return Err(InventoryError::OrderNotFulfilled {
                order_id: order.id(),
                status: OrderStatus::Pending,
            });
        };

        let total_price = unit_price.times(order.amount())?;

        Ok(Self {
            warehouse_id,
            product_id: order.product_id(),
            order_id: order.id(),
            amount: order.amount(),
            total_price,
            created_at: fulfilled_at,
        })
    }
}

/// A persisted stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Store-generated identifier.
    pub id: StockMovementId,
    /// Destination warehouse.
    pub warehouse_id: WarehouseId,
    /// Product moved.
    pub product_id: ProductId,
    /// Order satisfied.
    pub order_id: OrderId,
    /// Amount moved.
    pub amount: Quantity,
    /// Total price.
    pub total_price: Money,
    /// Movement time.
    pub created_at: Timestamp,
}

impl StockMovement {
    /// Attach a generated ID to a new movement.
    #[must_use]
    pub fn from_new(id: StockMovementId, movement: NewStockMovement) -> Self {
        Self {
            id,
            warehouse_id: movement.warehouse_id,
            product_id: movement.product_id,
            order_id: movement.order_id,
            amount: movement.amount,
            total_price: movement.total_price,
            created_at: movement.created_at,
        }
    }

    /// Event announcing this movement.
    #[must_use]
    pub const fn recorded_event(&self) -> InventoryEvent {
        InventoryEvent::StockMovementRecorded(StockMovementRecorded {
            movement_id: self.id,
            order_id: self.order_id,
            warehouse_id: self.warehouse_id,
            total_price: self.total_price,
            occurred_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::aggregate::ReconstitutedOrderParams;
    use rust_decimal_macros::dec;

    fn order(amount: i64) -> Order {
        Order::reconstitute(ReconstitutedOrderParams {
            id: OrderId::new(7),
            product_id: ProductId::new(3),
            amount: Quantity::new(amount),
            created_at: Timestamp::parse("2025-01-01T00:00:00Z").unwrap(),
            fulfilled_at: None,
        })
    }

    #[test]
    fn record_requires_fulfilled_order() {
        let err = NewStockMovement::record(&order(2), WarehouseId::new(1), Money::from_cents(100))
            .unwrap_err();
        assert!(matches!(err, InventoryError::OrderNotFulfilled { .. }));
    }

    #[test]
    fn record_computes_exact_total() {
        let mut order = order(20);
        let at = Timestamp::parse("2025-06-01T00:00:00Z").unwrap();
        order.fulfill(at).unwrap();

        let movement =
            NewStockMovement::record(&order, WarehouseId::new(1), Money::new(dec!(25.50))).unwrap();

        assert_eq!(movement.total_price, Money::new(dec!(510.00)));
        assert_eq!(movement.created_at, at);
        assert_eq!(movement.order_id, OrderId::new(7));
        assert_eq!(movement.product_id, ProductId::new(3));
    }

    #[test]
    fn record_keeps_decimal_precision() {
        let mut order = order(3);
        order.fulfill(Timestamp::now()).unwrap();

        let movement =
            NewStockMovement::record(&order, WarehouseId::new(2), Money::new(dec!(0.10))).unwrap();

        assert_eq!(movement.total_price.amount(), dec!(0.30));
    }

    #[test]
    fn from_new_keeps_fields() {
        let mut order = order(1);
        order.fulfill(Timestamp::now()).unwrap();
        let new = NewStockMovement::record(&order, WarehouseId::new(4), Money::from_cents(99)).unwrap();

        let stored = StockMovement::from_new(StockMovementId::new(11), new.clone());

        assert_eq!(stored.id, StockMovementId::new(11));
        assert_eq!(stored.total_price, new.total_price);
        assert_eq!(stored.warehouse_id, WarehouseId::new(4));
        assert_eq!(stored.recorded_event().event_type(), "STOCK_MOVEMENT_RECORDED");
    }
}
