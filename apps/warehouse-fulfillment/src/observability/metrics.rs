//! Prometheus metrics for the fulfillment engine.
//!
//! # Example
//!
//! ```ignore
//! use warehouse_fulfillment::config::MetricsConfig;
//! use warehouse_fulfillment::observability::{init_metrics, record_fulfillment};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_fulfillment("success", 0.004);
//! ```

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::MetricsConfig;

/// Latency buckets from 100us to 10s (covers the transaction deadline).
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Initialize the Prometheus metrics exporter.
///
/// Starts an HTTP listener exposing `/metrics`. Does nothing when disabled.
/// Intended for long-running hosts that embed the fulfillment use case.
///
/// # Errors
///
/// Returns an error if the address is invalid or the exporter fails to start.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        tracing::debug!("Metrics exporter disabled");
        return Ok(());
    }

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .map_err(|e| MetricsError::Configuration(format!("{}: {e}", config.listen_addr)))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets(LATENCY_BUCKETS)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(addr = %addr, "Prometheus metrics exporter started");

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Record one fulfillment attempt.
///
/// * `outcome` - `success`, or the failure outcome label
/// * `duration_seconds` - Time spent including the transaction
pub fn record_fulfillment(outcome: &'static str, duration_seconds: f64) {
    counter!("fulfillment_attempts_total", "outcome" => outcome).increment(1);
    histogram!("fulfillment_duration_seconds", "outcome" => outcome).record(duration_seconds);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_exporter_is_noop() {
        assert!(init_metrics(&MetricsConfig::default()).is_ok());
    }

    #[test]
    fn invalid_address_is_configuration_error() {
        let config = MetricsConfig {
            enabled: true,
            listen_addr: "not-an-addr".to_string(),
        };
        assert!(matches!(
            init_metrics(&config),
            Err(MetricsError::Configuration(_))
        ));
    }

    #[test]
    fn recording_without_recorder_does_not_panic() {
        record_fulfillment("success", 0.001);
        record_fulfillment("conflict", 0.002);
    }
}
