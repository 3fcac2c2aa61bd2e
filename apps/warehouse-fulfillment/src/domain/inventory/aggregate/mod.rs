//! Inventory aggregates.

mod order;
mod stock_movement;

pub use order::{Order, ReconstitutedOrderParams};
pub use stock_movement::{NewStockMovement, StockMovement};
