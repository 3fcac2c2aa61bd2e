//! Storage configuration.

use serde::{Deserialize, Serialize};

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// SQLite URL, e.g. `sqlite://./data/warehouse.db` or `sqlite::memory:`.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long to wait for a pooled connection.
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
    /// How long SQLite waits on a locked database before reporting busy.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Deadline for a whole fulfillment transaction.
    #[serde(default = "default_transaction_timeout_ms")]
    pub transaction_timeout_ms: u64,
    /// Create the database file if it does not exist.
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
            busy_timeout_ms: default_busy_timeout_ms(),
            transaction_timeout_ms: default_transaction_timeout_ms(),
            create_if_missing: default_create_if_missing(),
        }
    }
}

impl PersistenceConfig {
    /// Returns true if the URL names a private in-memory database.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

fn default_database_url() -> String {
    "sqlite://./data/warehouse.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_acquire_timeout_ms() -> u64 {
    5000
}

const fn default_busy_timeout_ms() -> u64 {
    5000
}

const fn default_transaction_timeout_ms() -> u64 {
    10_000
}

const fn default_create_if_missing() -> bool {
    true
}
