//! Warehouse Store Port (Driven Port)
//!
//! Transactional access to products, warehouses, orders and stock movements.
//! All fulfillment reads and writes go through one [`WarehouseTransaction`].

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::inventory::{NewStockMovement, Order, OrderMatchCriteria};
use crate::domain::shared::{Money, OrderId, ProductId, StockMovementId, Timestamp, WarehouseId};

/// Errors from storage adapters.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// A uniqueness constraint rejected the write.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Storage is locked by another writer.
    #[error("Storage busy: {0}")]
    Busy(String),

    /// Waiting for a connection or lock took too long.
    #[error("Storage timeout: {0}")]
    Timeout(String),

    /// Connection could not be established or was lost.
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Query error: {0}")]
    Query(String),

    /// Referential integrity violation.
    #[error("Data integrity error: {0}")]
    Integrity(String),

    /// Stored data could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Factory for fulfillment transactions.
#[async_trait]
pub trait WarehouseStore: Send + Sync {
    /// Transaction type produced by this store.
    type Transaction: WarehouseTransaction + 'static;

    /// Begin a transaction.
    ///
    /// Dropping the returned transaction without committing rolls it back.
    async fn begin(&self) -> Result<Self::Transaction, StorageError>;
}

/// A single atomic unit of work.
#[async_trait]
pub trait WarehouseTransaction: Send {
    /// Unit price of a product, `None` if the product does not exist.
    async fn product_price(&mut self, product_id: ProductId)
    -> Result<Option<Money>, StorageError>;

    /// Whether the warehouse exists.
    async fn warehouse_exists(&mut self, warehouse_id: WarehouseId) -> Result<bool, StorageError>;

    /// Orders satisfying the criteria, fulfilled or not.
    async fn find_matching_orders(
        &mut self,
        criteria: &OrderMatchCriteria,
    ) -> Result<Vec<Order>, StorageError>;

    /// Whether a stock movement already references the order.
    async fn movement_exists_for_order(&mut self, order_id: OrderId) -> Result<bool, StorageError>;

    /// Set `fulfilled_at` if it is unset.
    ///
    /// Returns `false` when the order is missing or already fulfilled.
    async fn mark_order_fulfilled(
        &mut self,
        order_id: OrderId,
        at: Timestamp,
    ) -> Result<bool, StorageError>;

    /// Insert a stock movement and return its generated ID.
    ///
    /// A second movement for the same order fails with `UniqueViolation`.
    async fn insert_movement(
        &mut self,
        movement: &NewStockMovement,
    ) -> Result<StockMovementId, StorageError>;

    /// Make all writes durable.
    async fn commit(self) -> Result<(), StorageError>;

    /// Discard all writes.
    async fn rollback(self) -> Result<(), StorageError>;
}
