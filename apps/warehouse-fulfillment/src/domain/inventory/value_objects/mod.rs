//! Inventory value objects.

mod match_criteria;
mod order_status;
mod product;

pub use match_criteria::OrderMatchCriteria;
pub use order_status::OrderStatus;
pub use product::Product;
