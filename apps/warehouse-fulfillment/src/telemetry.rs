//! Tracing Setup
//!
//! Installs the global `tracing` subscriber.
//!
//! - `RUST_LOG` overrides the configured level when set
//! - `format: json` emits one JSON object per event with the current span
//! - `format: pretty` emits multi-line human-readable output

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Errors while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Filter directives could not be parsed.
    #[error("invalid log filter '{directives}': {reason}")]
    InvalidFilter {
        /// Directives that failed.
        directives: String,
        /// Parser message.
        reason: String,
    },
    /// A global subscriber is already installed.
    #[error("tracing subscriber already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns error if the filter is invalid or a subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| config.level.clone());
    let filter = parse_filter(&directives)?;

    let result = if config.format == "pretty" {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_current_span(true)
            .with_env_filter(filter)
            .try_init()
    };

    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
}

fn parse_filter(directives: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directives).map_err(|e| TelemetryError::InvalidFilter {
        directives: directives.to_string(),
        reason: e.to_string(),
    })
}
