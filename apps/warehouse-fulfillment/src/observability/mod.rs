//! Observability
//!
//! Prometheus metrics for fulfillment attempts.

mod metrics;

pub use self::metrics::{MetricsError, init_metrics, record_fulfillment};
