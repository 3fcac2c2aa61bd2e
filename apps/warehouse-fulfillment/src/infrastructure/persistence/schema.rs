//! SQLite schema.
//!
//! Timestamps are stored as INTEGER microseconds since the Unix epoch. Prices
//! are stored as decimal TEXT so they never pass through floating point.

/// Statements applied in order by `SqliteWarehouseStore::migrate`.
pub const MIGRATIONS: &[&str] = &[
    r"CREATE TABLE IF NOT EXISTS products (
        id    INTEGER PRIMARY KEY,
        price TEXT    NOT NULL
    )",
    r"CREATE TABLE IF NOT EXISTS warehouses (
        id INTEGER PRIMARY KEY
    )",
    r"CREATE TABLE IF NOT EXISTS orders (
        id           INTEGER PRIMARY KEY,
        product_id   INTEGER NOT NULL REFERENCES products (id),
        amount       INTEGER NOT NULL CHECK (amount > 0),
        created_at   INTEGER NOT NULL,
        fulfilled_at INTEGER
    )",
    r"CREATE INDEX IF NOT EXISTS idx_orders_match
        ON orders (product_id, amount, created_at)",
    r"CREATE TABLE IF NOT EXISTS stock_movements (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        warehouse_id INTEGER NOT NULL REFERENCES warehouses (id),
        product_id   INTEGER NOT NULL REFERENCES products (id),
        order_id     INTEGER NOT NULL UNIQUE REFERENCES orders (id),
        amount       INTEGER NOT NULL,
        total_price  TEXT    NOT NULL,
        created_at   INTEGER NOT NULL
    )",
    // Single row written first by every fulfillment transaction.
    r"CREATE TABLE IF NOT EXISTS fulfillment_lock (
        id          INTEGER PRIMARY KEY CHECK (id = 1),
        acquired_at INTEGER NOT NULL
    )",
    r"INSERT OR IGNORE INTO fulfillment_lock (id, acquired_at) VALUES (1, 0)",
];
