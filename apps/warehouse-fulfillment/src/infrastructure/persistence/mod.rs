//! Persistence Adapters
//!
//! Implementations of the warehouse store port.

mod in_memory;
mod schema;
mod sqlite;

pub use in_memory::{InMemoryTransaction, InMemoryWarehouseStore};
pub use schema::MIGRATIONS;
pub use sqlite::{SqliteTransaction, SqliteWarehouseStore};
