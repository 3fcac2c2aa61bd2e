//! Order Aggregate Root
//!
//! Orders are created outside this service. Fulfillment only ever reads them
//! and performs the single `Pending -> Fulfilled` transition.

use crate::domain::inventory::errors::InventoryError;
use crate::domain::inventory::events::{InventoryEvent, OrderFulfilled};
use crate::domain::inventory::value_objects::OrderStatus;
use crate::domain::shared::{OrderId, ProductId, Quantity, Timestamp};

/// Parameters for reconstituting an Order from storage.
///
/// No domain events are generated during reconstitution.
#[derive(Debug, Clone)]
pub struct ReconstitutedOrderParams {
    /// Order identifier.
    pub id: OrderId,
    /// Ordered product.
    pub product_id: ProductId,
    /// Ordered amount.
    pub amount: Quantity,
    /// Creation time.
    pub created_at: Timestamp,
    /// Fulfillment time, if fulfilled.
    pub fulfilled_at: Option<Timestamp>,
}

/// Order aggregate root.
#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    product_id: ProductId,
    amount: Quantity,
    created_at: Timestamp,
    fulfilled_at: Option<Timestamp>,
    events: Vec<InventoryEvent>,
}

impl Order {
    /// Reconstitute an order from stored state (no events generated).
    #[must_use]
    pub fn reconstitute(params: ReconstitutedOrderParams) -> Self {
        Self {
            id: params.id,
            product_id: params.product_id,
            amount: params.amount,
            created_at: params.created_at,
            fulfilled_at: params.fulfilled_at,
            events: Vec::new(),
        }
    }

    // Getters

    /// Get the order ID.
    #[must_use]
    pub const fn id(&self) -> OrderId {
        self.id
    }

    /// Get the product ID.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Get the ordered amount.
    #[must_use]
    pub const fn amount(&self) -> Quantity {
        self.amount
    }

    /// Get the creation time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Get the fulfillment time.
    #[must_use]
    pub const fn fulfilled_at(&self) -> Option<Timestamp> {
        self.fulfilled_at
    }

    /// Derived lifecycle status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        if self.fulfilled_at.is_some() {
            OrderStatus::Fulfilled
        } else {
            OrderStatus::Pending
        }
    }

    /// Returns true if the order has not been fulfilled.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.fulfilled_at.is_none()
    }

    /// Returns true if the order has been fulfilled.
    #[must_use]
    pub const fn is_fulfilled(&self) -> bool {
        self.fulfilled_at.is_some()
    }

    // Commands

    /// Mark the order fulfilled at `at`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyFulfilled` if the order is not pending. The existing
    /// fulfillment time is left untouched.
    pub fn fulfill(&mut self, at: Timestamp) -> Result<(), InventoryError> {
        if !self.status().can_transition_to(OrderStatus::Fulfilled) {
            return Err(InventoryError::AlreadyFulfilled { order_id: self.id });
        }

        self.fulfilled_at = Some(at);
        self.events.push(InventoryEvent::OrderFulfilled(OrderFulfilled {
            order_id: self.id,
            product_id: self.product_id,
            amount: self.amount,
            occurred_at: at,
        }));

        Ok(())
    }

    /// Drain accumulated domain events.
    pub fn drain_events(&mut self) -> Vec<InventoryEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get pending events without draining.
    #[must_use]
    pub fn pending_events(&self) -> &[InventoryEvent] {
        &self.events
    }
}
