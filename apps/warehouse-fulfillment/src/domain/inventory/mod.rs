//! Inventory Bounded Context
//!
//! Moves ordered stock into warehouses, one order at a time.
//!
//! # Key Concepts
//!
//! - **Order Aggregate**: a request to move an amount of a product; `Pending`
//!   until fulfilled, then `Fulfilled` forever
//! - **Stock Movement**: the durable record that an order was satisfied from a
//!   warehouse, carrying the exact total price
//! - **Order Matcher**: deterministic choice of the single order a request fulfils

pub mod aggregate;
pub mod errors;
pub mod events;
pub mod services;
pub mod value_objects;

pub use aggregate::{NewStockMovement, Order, ReconstitutedOrderParams, StockMovement};
pub use errors::InventoryError;
pub use events::{InventoryEvent, OrderFulfilled, StockMovementRecorded};
pub use services::OrderMatcher;
pub use value_objects::{OrderMatchCriteria, OrderStatus, Product};
