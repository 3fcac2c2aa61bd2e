//! Application Use Cases

mod fulfill_order;

pub use fulfill_order::{FulfillOrderCommand, FulfillOrderUseCase, FulfillmentReceipt};
