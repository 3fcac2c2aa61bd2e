//! Inventory domain services.

mod order_matcher;

pub use order_matcher::OrderMatcher;
