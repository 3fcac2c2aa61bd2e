//! Dependency Injection Container
//!
//! Wires a warehouse store and the configuration into use cases.

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{StorageError, WarehouseStore};
use crate::application::use_cases::FulfillOrderUseCase;
use crate::config::Config;
use crate::infrastructure::persistence::{InMemoryWarehouseStore, SqliteWarehouseStore};

/// Dependency injection container.
pub struct Container<S>
where
    S: WarehouseStore + 'static,
{
    store: Arc<S>,
    config: Config,
}

impl<S> Container<S>
where
    S: WarehouseStore + 'static,
{
    /// Create a container around an existing store.
    pub const fn new(store: Arc<S>, config: Config) -> Self {
        Self { store, config }
    }

    /// Get the store.
    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Get the configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Build the fulfillment use case with the configured deadline.
    pub fn fulfill_order_use_case(&self) -> FulfillOrderUseCase<S> {
        let timeout = Duration::from_millis(self.config.persistence.transaction_timeout_ms);
        FulfillOrderUseCase::new(self.store()).with_transaction_timeout(timeout)
    }
}

impl Container<SqliteWarehouseStore> {
    /// Connect to SQLite and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened or migrated.
    pub async fn sqlite(config: Config) -> Result<Self, StorageError> {
        let store = SqliteWarehouseStore::connect(&config.persistence).await?;
        store.migrate().await?;
        Ok(Self::new(Arc::new(store), config))
    }
}

impl Container<InMemoryWarehouseStore> {
    /// Container over an empty in-memory store.
    pub fn in_memory(config: Config) -> Self {
        Self::new(Arc::new(InMemoryWarehouseStore::new()), config)
    }
}
