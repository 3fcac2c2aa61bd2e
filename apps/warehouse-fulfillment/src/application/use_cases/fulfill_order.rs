//! Fulfill Order Use Case
//!
//! Records that an order's stock has been moved into a warehouse. Every step
//! runs inside one storage transaction:
//!
//! 1. validate the request (no storage access)
//! 2. check that the product and warehouse exist, resolving the unit price
//! 3. match the request to one order
//! 4. reject orders that are already fulfilled
//! 5. mark the order fulfilled with a guarded update
//! 6. insert the stock movement (unique per order)
//! 7. commit
//!
//! Any failure rolls the transaction back before it is reported. Steps 1-6
//! run under the transaction deadline; the commit itself does not.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::dto::{FulfillOrderRequestDto, FulfillOrderResponseDto};
use crate::application::errors::{FulfillmentError, MissingEntity};
use crate::application::ports::{
    FulfillmentService, StorageError, WarehouseStore, WarehouseTransaction,
};
use crate::domain::inventory::{
    InventoryEvent, NewStockMovement, OrderMatchCriteria, OrderMatcher, StockMovement,
};
use crate::domain::shared::{
    Money, OrderId, ProductId, Quantity, StockMovementId, Timestamp, WarehouseId,
};
use crate::observability::record_fulfillment;

/// Command to fulfil the order matching a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillOrderCommand {
    /// Product being moved.
    pub product_id: ProductId,
    /// Destination warehouse.
    pub warehouse_id: WarehouseId,
    /// Amount being moved.
    pub amount: Quantity,
    /// Request time; matched orders must be strictly older.
    pub requested_at: Timestamp,
}

impl FulfillOrderCommand {
    /// Validate the command parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the amount is not positive or an ID is not
    /// a valid storage ID.
    pub fn validate(&self) -> Result<(), FulfillmentError> {
        self.amount.validate_for_fulfillment()?;

        if !self.product_id.is_valid() {
            return Err(invalid_id("productId", self.product_id.value()));
        }
        if !self.warehouse_id.is_valid() {
            return Err(invalid_id("warehouseId", self.warehouse_id.value()));
        }
        Ok(())
    }
}

fn invalid_id(field: &str, value: i64) -> FulfillmentError {
    FulfillmentError::InvalidInput {
        field: field.to_string(),
        message: format!("ID must be greater than 0 (got {value})"),
    }
}

/// Outcome of a successful fulfillment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FulfillmentReceipt {
    /// Generated stock movement ID.
    pub movement_id: StockMovementId,
    /// Fulfilled order.
    pub order_id: OrderId,
    /// `amount * unit_price`.
    pub total_price: Money,
    /// Fulfillment time, shared by the order and the movement.
    pub fulfilled_at: Timestamp,
    /// Domain events raised by the fulfillment.
    pub events: Vec<InventoryEvent>,
}

/// Use case for exactly-once order fulfillment.
pub struct FulfillOrderUseCase<S>
where
    S: WarehouseStore,
{
    store: Arc<S>,
    matcher: OrderMatcher,
    transaction_timeout: Duration,
}

impl<S> FulfillOrderUseCase<S>
where
    S: WarehouseStore,
{
    /// Deadline applied when none is configured.
    pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a new FulfillOrderUseCase.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            matcher: OrderMatcher::new(),
            transaction_timeout: Self::DEFAULT_TRANSACTION_TIMEOUT,
        }
    }

    /// Set the deadline for the whole transaction.
    #[must_use]
    pub const fn with_transaction_timeout(mut self, timeout: Duration) -> Self {
        self.transaction_timeout = timeout;
        self
    }

    /// Deadline for the whole transaction.
    pub const fn transaction_timeout(&self) -> Duration {
        self.transaction_timeout
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// See [`FulfillmentError`]. No writes survive a failed call.
    #[tracing::instrument(
        skip(self),
        fields(
            product_id = %command.product_id,
            warehouse_id = %command.warehouse_id,
            amount = %command.amount,
        )
    )]
    pub async fn execute(
        &self,
        command: FulfillOrderCommand,
    ) -> Result<FulfillmentReceipt, FulfillmentError> {
        let started = Instant::now();

        let result = self.run_transaction(&command).await;

        let elapsed = started.elapsed().as_secs_f64();
        match &result {
            Ok(receipt) => {
                record_fulfillment("success", elapsed);
                tracing::info!(
                    order_id = %receipt.order_id,
                    movement_id = %receipt.movement_id,
                    total_price = %receipt.total_price,
                    "Order fulfilled"
                );
            }
            Err(err) => {
                record_fulfillment(err.outcome(), elapsed);
                match err {
                    FulfillmentError::Internal(_) => {
                        tracing::error!(error = %err, "Fulfillment failed");
                    }
                    _ => {
                        tracing::warn!(error = %err, code = %err.error_code(), "Fulfillment rejected");
                    }
                }
            }
        }

        result
    }

    /// The deadline covers every step up to the commit, not the commit itself.
    async fn run_transaction(
        &self,
        command: &FulfillOrderCommand,
    ) -> Result<FulfillmentReceipt, FulfillmentError> {
        // Dropping the in-flight future drops the transaction, which rolls back.
        let (tx, receipt) = tokio::time::timeout(self.transaction_timeout, self.stage(command))
            .await
            .map_err(|_| {
                FulfillmentError::Transient(format!(
                    "transaction exceeded {}ms",
                    self.transaction_timeout.as_millis()
                ))
            })??;

        tx.commit().await?;
        Ok(receipt)
    }

    async fn stage(
        &self,
        command: &FulfillOrderCommand,
    ) -> Result<(S::Transaction, FulfillmentReceipt), FulfillmentError> {
        command.validate()?;

        let mut tx = self.store.begin().await?;

        match self.fulfill_in(&mut tx, command).await {
            Ok(receipt) => Ok((tx, receipt)),
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn fulfill_in(
        &self,
        tx: &mut S::Transaction,
        command: &FulfillOrderCommand,
    ) -> Result<FulfillmentReceipt, FulfillmentError> {
        let unit_price = Self::check_existence(tx, command).await?;

        let criteria =
            OrderMatchCriteria::new(command.product_id, command.amount, command.requested_at);
        let candidates = tx.find_matching_orders(&criteria).await?;
        tracing::debug!(candidates = candidates.len(), "Loaded candidate orders");

        let mut order = self.matcher.select(&criteria, candidates).ok_or(
            FulfillmentError::NoMatchingOrder {
                product_id: command.product_id,
                amount: command.amount,
                requested_at: command.requested_at,
            },
        )?;
        let order_id = order.id();

        if tx.movement_exists_for_order(order_id).await? {
            return Err(FulfillmentError::Conflict {
                reason: format!("order {order_id} already has a stock movement"),
            });
        }

        let now = Timestamp::now();
        order.fulfill(now)?;

        if !tx.mark_order_fulfilled(order_id, now).await? {
            return Err(FulfillmentError::Conflict {
                reason: format!("order {order_id} was fulfilled concurrently"),
            });
        }

        let movement = NewStockMovement::record(&order, command.warehouse_id, unit_price)?;
        let movement_id = tx
            .insert_movement(&movement)
            .await
            .map_err(|err| match err {
                StorageError::UniqueViolation(_) => FulfillmentError::Conflict {
                    reason: format!("order {order_id} already has a stock movement"),
                },
                other => other.into(),
            })?;

        let stored = StockMovement::from_new(movement_id, movement);
        let mut events = order.drain_events();
        events.push(stored.recorded_event());
        for event in &events {
            tracing::debug!(event_type = event.event_type(), order_id = %event.order_id(), "Domain event");
        }

        Ok(FulfillmentReceipt {
            movement_id,
            order_id,
            total_price: stored.total_price,
            fulfilled_at: now,
            events,
        })
    }

    /// Product first, then warehouse. Returns the product's unit price.
    async fn check_existence(
        tx: &mut S::Transaction,
        command: &FulfillOrderCommand,
    ) -> Result<Money, FulfillmentError> {
        let unit_price = tx
            .product_price(command.product_id)
            .await?
            .ok_or(FulfillmentError::NotFound(MissingEntity::Product(
                command.product_id,
            )))?;

        if !tx.warehouse_exists(command.warehouse_id).await? {
            return Err(FulfillmentError::NotFound(MissingEntity::Warehouse(
                command.warehouse_id,
            )));
        }

        Ok(unit_price)
    }
}

#[async_trait]
impl<S> FulfillmentService for FulfillOrderUseCase<S>
where
    S: WarehouseStore + 'static,
{
    async fn fulfill(
        &self,
        request: FulfillOrderRequestDto,
    ) -> Result<FulfillOrderResponseDto, FulfillmentError> {
        let receipt = self.execute(request.to_command()).await?;
        Ok(FulfillOrderResponseDto::from(&receipt))
    }
}
