//! In-Memory Warehouse Store
//!
//! Serializable store for tests and development. A transaction owns the table
//! lock for its whole lifetime and works on a private copy of the tables; the
//! copy replaces the shared tables only on commit.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::application::ports::{StorageError, WarehouseStore, WarehouseTransaction};
use crate::domain::inventory::{
    NewStockMovement, Order, OrderMatchCriteria, Product, ReconstitutedOrderParams, StockMovement,
};
use crate::domain::shared::{Money, OrderId, ProductId, StockMovementId, Timestamp, WarehouseId};

#[derive(Debug, Clone, Default)]
struct WarehouseTables {
    products: BTreeMap<ProductId, Product>,
    warehouses: BTreeSet<WarehouseId>,
    orders: BTreeMap<OrderId, ReconstitutedOrderParams>,
    movements: BTreeMap<StockMovementId, StockMovement>,
    last_movement_id: i64,
}

impl WarehouseTables {
    fn has_movement_for(&self, order_id: OrderId) -> bool {
        self.movements.values().any(|m| m.order_id == order_id)
    }
}

/// In-memory implementation of [`WarehouseStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryWarehouseStore {
    tables: Arc<Mutex<WarehouseTables>>,
}

impl InMemoryWarehouseStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product.
    pub async fn insert_product(&self, product: Product) {
        self.tables.lock().await.products.insert(product.id, product);
    }

    /// Insert a warehouse.
    pub async fn insert_warehouse(&self, warehouse_id: WarehouseId) {
        self.tables.lock().await.warehouses.insert(warehouse_id);
    }

    /// Insert an order with an explicit ID.
    ///
    /// # Errors
    ///
    /// `Integrity` if the product is unknown, `UniqueViolation` if the ID is taken.
    pub async fn insert_order(&self, order: ReconstitutedOrderParams) -> Result<OrderId, StorageError> {
        let mut tables = self.tables.lock().await;
        if !tables.products.contains_key(&order.product_id) {
            return Err(StorageError::Integrity(format!(
                "order {} references unknown product {}",
                order.id, order.product_id
            )));
        }
        if tables.orders.contains_key(&order.id) {
            return Err(StorageError::UniqueViolation(format!("orders.id = {}", order.id)));
        }
        let id = order.id;
        tables.orders.insert(id, order);
        Ok(id)
    }

    /// Load an order by ID.
    pub async fn find_order(&self, order_id: OrderId) -> Option<Order> {
        self.tables
            .lock()
            .await
            .orders
            .get(&order_id)
            .cloned()
            .map(Order::reconstitute)
    }

    /// All stock movements recorded for an order.
    pub async fn movements_for_order(&self, order_id: OrderId) -> Vec<StockMovement> {
        self.tables
            .lock()
            .await
            .movements
            .values()
            .filter(|m| m.order_id == order_id)
            .cloned()
            .collect()
    }

    /// Total number of stock movements.
    pub async fn count_movements(&self) -> usize {
        self.tables.lock().await.movements.len()
    }
}

#[async_trait]
impl WarehouseStore for InMemoryWarehouseStore {
    type Transaction = InMemoryTransaction;

    async fn begin(&self) -> Result<Self::Transaction, StorageError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let staged = guard.clone();
        Ok(InMemoryTransaction { guard, staged })
    }
}

/// Transaction over [`InMemoryWarehouseStore`].
#[derive(Debug)]
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<WarehouseTables>,
    staged: WarehouseTables,
}

#[async_trait]
impl WarehouseTransaction for InMemoryTransaction {
    async fn product_price(&mut self, product_id: ProductId) -> Result<Option<Money>, StorageError> {
        Ok(self.staged.products.get(&product_id).map(|p| p.unit_price))
    }

    async fn warehouse_exists(&mut self, warehouse_id: WarehouseId) -> Result<bool, StorageError> {
        Ok(self.staged.warehouses.contains(&warehouse_id))
    }

    async fn find_matching_orders(
        &mut self,
        criteria: &OrderMatchCriteria,
    ) -> Result<Vec<Order>, StorageError> {
        Ok(self
            .staged
            .orders
            .values()
            .cloned()
            .map(Order::reconstitute)
            .filter(|order| criteria.is_satisfied_by(order))
            .collect())
    }

    async fn movement_exists_for_order(&mut self, order_id: OrderId) -> Result<bool, StorageError> {
        Ok(self.staged.has_movement_for(order_id))
    }

    async fn mark_order_fulfilled(
        &mut self,
        order_id: OrderId,
        at: Timestamp,
    ) -> Result<bool, StorageError> {
        match self.staged.orders.get_mut(&order_id) {
            Some(order) if order.fulfilled_at.is_none() => {
                order.fulfilled_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_movement(
        &mut self,
        movement: &NewStockMovement,
    ) -> Result<StockMovementId, StorageError> {
        let tables = &mut self.staged;
        if tables.has_movement_for(movement.order_id) {
            return Err(StorageError::UniqueViolation(format!(
                "stock_movements.order_id = {}",
                movement.order_id
            )));
        }
        if !tables.products.contains_key(&movement.product_id)
            || !tables.warehouses.contains(&movement.warehouse_id)
            || !tables.orders.contains_key(&movement.order_id)
        {
            return Err(StorageError::Integrity(format!(
                "stock movement for order {} references a missing row",
                movement.order_id
            )));
        }

        tables.last_movement_id += 1;
        let id = StockMovementId::new(tables.last_movement_id);
        tables
            .movements
            .insert(id, StockMovement::from_new(id, movement.clone()));
        Ok(id)
    }

    async fn commit(self) -> Result<(), StorageError> {
        let Self { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StorageError> {
        Ok(())
    }
}
