//! SQLite Warehouse Store
//!
//! Durable [`WarehouseStore`] over an `SQLx` SQLite pool.
//!
//! Every transaction starts by writing the `fulfillment_lock` row. That takes
//! the database write lock before any read, so concurrent fulfillments queue on
//! `busy_timeout` instead of failing on a read-to-write upgrade. The guarded
//! `UPDATE ... WHERE fulfilled_at IS NULL` and the UNIQUE index on
//! `stock_movements.order_id` then make a second fulfillment of the same order
//! impossible.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Row, Sqlite, Transaction};
use tracing::{debug, info};

use super::schema::MIGRATIONS;
use crate::application::ports::{StorageError, WarehouseStore, WarehouseTransaction};
use crate::config::PersistenceConfig;
use crate::domain::inventory::{
    NewStockMovement, Order, OrderMatchCriteria, Product, ReconstitutedOrderParams, StockMovement,
};
use crate::domain::shared::{
    Money, OrderId, ProductId, Quantity, StockMovementId, Timestamp, WarehouseId,
};

// ============================================================================
// Error classification
// ============================================================================

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Returns true for SQLite result codes meaning "locked by someone else".
///
/// Extended codes (e.g. `SQLITE_BUSY_SNAPSHOT` = 517) share the primary code in
/// the low byte.
fn is_busy_code(code: &str) -> bool {
    code.parse::<i32>()
        .is_ok_and(|c| matches!(c & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                if db_err.code().is_some_and(|code| is_busy_code(&code)) {
                    return Self::Busy(db_err.message().to_string());
                }
                match db_err.kind() {
                    sqlx::error::ErrorKind::UniqueViolation => {
                        Self::UniqueViolation(db_err.message().to_string())
                    }
                    sqlx::error::ErrorKind::ForeignKeyViolation
                    | sqlx::error::ErrorKind::NotNullViolation
                    | sqlx::error::ErrorKind::CheckViolation => {
                        Self::Integrity(db_err.message().to_string())
                    }
                    _ => Self::Query(db_err.message().to_string()),
                }
            }
            sqlx::Error::PoolTimedOut => Self::Timeout(err.to_string()),
            sqlx::Error::Io(_) | sqlx::Error::PoolClosed | sqlx::Error::Configuration(_) => {
                Self::Connection(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_) => Self::Serialization(err.to_string()),
            _ => Self::Query(err.to_string()),
        }
    }
}

// ============================================================================
// Row decoding
// ============================================================================

fn decode_timestamp(micros: i64, column: &str) -> Result<Timestamp, StorageError> {
    Timestamp::from_unix_micros(micros).ok_or_else(|| {
        StorageError::Serialization(format!("{column} out of range: {micros}"))
    })
}

fn decode_money(text: &str, column: &str) -> Result<Money, StorageError> {
    Money::parse(text).map_err(|e| StorageError::Serialization(format!("{column}: {e}")))
}

fn row_to_order(row: &SqliteRow) -> Result<Order, StorageError> {
    let fulfilled_at = row
        .try_get::<Option<i64>, _>("fulfilled_at")?
        .map(|micros| decode_timestamp(micros, "fulfilled_at"))
        .transpose()?;

    Ok(Order::reconstitute(ReconstitutedOrderParams {
        id: OrderId::new(row.try_get("id")?),
        product_id: ProductId::new(row.try_get("product_id")?),
        amount: Quantity::new(row.try_get("amount")?),
        created_at: decode_timestamp(row.try_get("created_at")?, "created_at")?,
        fulfilled_at,
    }))
}

fn row_to_movement(row: &SqliteRow) -> Result<StockMovement, StorageError> {
    let total_price: String = row.try_get("total_price")?;

    Ok(StockMovement {
        id: StockMovementId::new(row.try_get("id")?),
        warehouse_id: WarehouseId::new(row.try_get("warehouse_id")?),
        product_id: ProductId::new(row.try_get("product_id")?),
        order_id: OrderId::new(row.try_get("order_id")?),
        amount: Quantity::new(row.try_get("amount")?),
        total_price: decode_money(&total_price, "total_price")?,
        created_at: decode_timestamp(row.try_get("created_at")?, "created_at")?,
    })
}

// ============================================================================
// Store
// ============================================================================

/// SQLite implementation of [`WarehouseStore`].
#[derive(Debug, Clone)]
pub struct SqliteWarehouseStore {
    pool: SqlitePool,
}

impl SqliteWarehouseStore {
    /// Open a pool as described by the persistence config.
    ///
    /// An in-memory URL is limited to one never-recycled connection, since each
    /// SQLite connection would otherwise see its own empty database.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or the database cannot be opened.
    pub async fn connect(config: &PersistenceConfig) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(config.create_if_missing)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms));
        if config.is_in_memory() {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;

        info!(
            database_url = %config.database_url,
            max_connections = config.max_connections,
            "Connected to SQLite"
        );

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns error if any statement fails.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        for statement in MIGRATIONS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!(statements = MIGRATIONS.len(), "Schema migrated");
        Ok(())
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// `UniqueViolation` if the ID is taken.
    pub async fn insert_product(&self, product: &Product) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO products (id, price) VALUES (?, ?)")
            .bind(product.id.value())
            .bind(product.unit_price.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert a warehouse.
    ///
    /// # Errors
    ///
    /// `UniqueViolation` if the ID is taken.
    pub async fn insert_warehouse(&self, warehouse_id: WarehouseId) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO warehouses (id) VALUES (?)")
            .bind(warehouse_id.value())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert an order with an explicit ID.
    ///
    /// # Errors
    ///
    /// `Integrity` if the product is unknown or the amount is not positive,
    /// `UniqueViolation` if the ID is taken.
    pub async fn insert_order(
        &self,
        order: &ReconstitutedOrderParams,
    ) -> Result<OrderId, StorageError> {
        sqlx::query(
            "INSERT INTO orders (id, product_id, amount, created_at, fulfilled_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(order.id.value())
        .bind(order.product_id.value())
        .bind(order.amount.value())
        .bind(order.created_at.unix_micros())
        .bind(order.fulfilled_at.map(|t| t.unix_micros()))
        .execute(&self.pool)
        .await?;
        Ok(order.id)
    }

    /// Load an order by ID.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails or the row cannot be decoded.
    pub async fn find_order(&self, order_id: OrderId) -> Result<Option<Order>, StorageError> {
        let row = sqlx::query(
            "SELECT id, product_id, amount, created_at, fulfilled_at FROM orders WHERE id = ?",
        )
        .bind(order_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_order).transpose()
    }

    /// All stock movements recorded for an order.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails or a row cannot be decoded.
    pub async fn movements_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<StockMovement>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, warehouse_id, product_id, order_id, amount, total_price, created_at \
             FROM stock_movements WHERE order_id = ? ORDER BY id",
        )
        .bind(order_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_movement).collect()
    }

    /// Total number of stock movements.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn count_movements(&self) -> Result<i64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM stock_movements")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }
}

#[async_trait]
impl WarehouseStore for SqliteWarehouseStore {
    type Transaction = SqliteTransaction;

    async fn begin(&self) -> Result<Self::Transaction, StorageError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE fulfillment_lock SET acquired_at = ? WHERE id = 1")
            .bind(Timestamp::now().unix_micros())
            .execute(&mut *tx)
            .await?;

        debug!("Fulfillment transaction started");
        Ok(SqliteTransaction { tx })
    }
}

/// Transaction over [`SqliteWarehouseStore`]. Rolls back on drop.
pub struct SqliteTransaction {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl WarehouseTransaction for SqliteTransaction {
    async fn product_price(&mut self, product_id: ProductId) -> Result<Option<Money>, StorageError> {
        let row = sqlx::query("SELECT price FROM products WHERE id = ?")
            .bind(product_id.value())
            .fetch_optional(&mut *self.tx)
            .await?;

        match row {
            Some(row) => {
                let price: String = row.try_get("price")?;
                Ok(Some(decode_money(&price, "price")?))
            }
            None => Ok(None),
        }
    }

    async fn warehouse_exists(&mut self, warehouse_id: WarehouseId) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM warehouses WHERE id = ?")
            .bind(warehouse_id.value())
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.is_some())
    }

    async fn find_matching_orders(
        &mut self,
        criteria: &OrderMatchCriteria,
    ) -> Result<Vec<Order>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, product_id, amount, created_at, fulfilled_at FROM orders \
             WHERE product_id = ? AND amount = ? AND created_at < ? \
             ORDER BY fulfilled_at IS NOT NULL, created_at, id",
        )
        .bind(criteria.product_id.value())
        .bind(criteria.amount.value())
        // Stored values are whole microseconds; rounding the bound up keeps `<` strict.
        .bind(criteria.created_before.unix_micros_ceil())
        .fetch_all(&mut *self.tx)
        .await?;

        rows.iter().map(row_to_order).collect()
    }

    async fn movement_exists_for_order(&mut self, order_id: OrderId) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM stock_movements WHERE order_id = ?")
            .bind(order_id.value())
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.is_some())
    }

    async fn mark_order_fulfilled(
        &mut self,
        order_id: OrderId,
        at: Timestamp,
    ) -> Result<bool, StorageError> {
        let result =
            sqlx::query("UPDATE orders SET fulfilled_at = ? WHERE id = ? AND fulfilled_at IS NULL")
                .bind(at.unix_micros())
                .bind(order_id.value())
                .execute(&mut *self.tx)
                .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn insert_movement(
        &mut self,
        movement: &NewStockMovement,
    ) -> Result<StockMovementId, StorageError> {
        let result = sqlx::query(
            "INSERT INTO stock_movements \
             (warehouse_id, product_id, order_id, amount, total_price, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(movement.warehouse_id.value())
        .bind(movement.product_id.value())
        .bind(movement.order_id.value())
        .bind(movement.amount.value())
        .bind(movement.total_price.to_string())
        .bind(movement.created_at.unix_micros())
        .execute(&mut *self.tx)
        .await?;

        Ok(StockMovementId::new(result.last_insert_rowid()))
    }

    async fn commit(self) -> Result<(), StorageError> {
        self.tx.commit().await?;
        debug!("Fulfillment transaction committed");
        Ok(())
    }

    async fn rollback(self) -> Result<(), StorageError> {
        self.tx.rollback().await?;
        debug!("Fulfillment transaction rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;
    use test_case::test_case;

    async fn file_store(dir: &TempDir) -> SqliteWarehouseStore {
        let config = PersistenceConfig {
            database_url: format!("sqlite://{}", dir.path().join("warehouse.db").display()),
            ..PersistenceConfig::default()
        };
        let store = SqliteWarehouseStore::connect(&config).await.unwrap();
        store.migrate().await.unwrap();
        store
    }

    async fn seed(store: &SqliteWarehouseStore) {
        store
            .insert_product(&Product::new(ProductId::new(1), Money::new(dec!(10.00))))
            .await
            .unwrap();
        store.insert_warehouse(WarehouseId::new(1)).await.unwrap();
        store
            .insert_order(&ReconstitutedOrderParams {
                id: OrderId::new(5),
                product_id: ProductId::new(1),
                amount: Quantity::new(3),
                created_at: Timestamp::parse("2025-01-01T00:00:00Z").unwrap(),
                fulfilled_at: None,
            })
            .await
            .unwrap();
    }

    fn movement() -> NewStockMovement {
        NewStockMovement {
            warehouse_id: WarehouseId::new(1),
            product_id: ProductId::new(1),
            order_id: OrderId::new(5),
            amount: Quantity::new(3),
            total_price: Money::new(dec!(30.00)),
            created_at: Timestamp::parse("2025-01-02T00:00:00Z").unwrap(),
        }
    }

    #[test_case("5", true ; "busy")]
    #[test_case("6", true ; "locked")]
    #[test_case("517", true ; "busy snapshot")]
    #[test_case("262", true ; "locked sharedcache")]
    #[test_case("2067", false ; "unique constraint")]
    #[test_case("787", false ; "foreign key")]
    #[test_case("not-a-code", false ; "garbage")]
    fn classifies_busy_codes(code: &str, expected: bool) {
        assert_eq!(is_busy_code(code), expected);
    }

    #[tokio::test]
    async fn migrate_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir).await;
        store.migrate().await.unwrap();
        assert_eq!(store.count_movements().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn price_text_keeps_scale() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir).await;
        seed(&store).await;

        let mut tx = store.begin().await.unwrap();
        let price = tx.product_price(ProductId::new(1)).await.unwrap().unwrap();
        assert_eq!(price.to_string(), "10.00");
        assert!(tx.product_price(ProductId::new(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn committed_movement_is_readable() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir).await;
        seed(&store).await;

        let at = Timestamp::parse("2025-01-02T00:00:00Z").unwrap();
        let mut tx = store.begin().await.unwrap();
        assert!(tx.mark_order_fulfilled(OrderId::new(5), at).await.unwrap());
        let id = tx.insert_movement(&movement()).await.unwrap();
        tx.commit().await.unwrap();

        let movements = store.movements_for_order(OrderId::new(5)).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].id, id);
        assert_eq!(movements[0].total_price.amount(), dec!(30.00));

        let order = store.find_order(OrderId::new(5)).await.unwrap().unwrap();
        assert_eq!(order.fulfilled_at(), Some(at));
    }

    #[tokio::test]
    async fn rollback_discards_writes() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir).await;
        seed(&store).await;

        let mut tx = store.begin().await.unwrap();
        tx.mark_order_fulfilled(OrderId::new(5), Timestamp::now())
            .await
            .unwrap();
        tx.insert_movement(&movement()).await.unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(store.count_movements().await.unwrap(), 0);
        let order = store.find_order(OrderId::new(5)).await.unwrap().unwrap();
        assert!(order.is_pending());
    }

    #[tokio::test]
    async fn duplicate_movement_is_unique_violation() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir).await;
        seed(&store).await;

        let mut tx = store.begin().await.unwrap();
        tx.insert_movement(&movement()).await.unwrap();
        let err = tx.insert_movement(&movement()).await.unwrap_err();

        assert!(matches!(err, StorageError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn unknown_warehouse_is_integrity_error() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir).await;
        seed(&store).await;

        let mut bad = movement();
        bad.warehouse_id = WarehouseId::new(42);
        let mut tx = store.begin().await.unwrap();
        let err = tx.insert_movement(&bad).await.unwrap_err();

        assert!(matches!(err, StorageError::Integrity(_)));
    }

    #[tokio::test]
    async fn guarded_update_touches_pending_orders_only() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir).await;
        seed(&store).await;

        let mut tx = store.begin().await.unwrap();
        assert!(tx.mark_order_fulfilled(OrderId::new(5), Timestamp::now()).await.unwrap());
        assert!(!tx.mark_order_fulfilled(OrderId::new(5), Timestamp::now()).await.unwrap());
    }

    #[tokio::test]
    async fn matching_orders_prefer_pending_then_oldest() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir).await;
        seed(&store).await;
        store
            .insert_order(&ReconstitutedOrderParams {
                id: OrderId::new(2),
                product_id: ProductId::new(1),
                amount: Quantity::new(3),
                created_at: Timestamp::parse("2024-01-01T00:00:00Z").unwrap(),
                fulfilled_at: Some(Timestamp::parse("2024-02-01T00:00:00Z").unwrap()),
            })
            .await
            .unwrap();

        let criteria = OrderMatchCriteria::new(
            ProductId::new(1),
            Quantity::new(3),
            Timestamp::parse("2025-06-01T00:00:00Z").unwrap(),
        );
        let mut tx = store.begin().await.unwrap();
        let orders = tx.find_matching_orders(&criteria).await.unwrap();

        let ids: Vec<_> = orders.iter().map(|o| o.id().value()).collect();
        assert_eq!(ids, vec![5, 2]);
    }

    #[tokio::test]
    async fn in_memory_url_shares_one_database() {
        let config = PersistenceConfig {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 4,
            ..PersistenceConfig::default()
        };
        let store = SqliteWarehouseStore::connect(&config).await.unwrap();
        store.migrate().await.unwrap();
        seed(&store).await;

        assert!(store.find_order(OrderId::new(5)).await.unwrap().is_some());
    }
}
