//! Configuration module for the fulfillment engine.
//!
//! YAML configuration with environment variable interpolation and validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use warehouse_fulfillment::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! println!("database: {}", config.persistence.database_url);
//! ```

mod observability;
mod persistence;

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use observability::{LoggingConfig, MetricsConfig, ObservabilityConfig};
pub use persistence::PersistenceConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Storage configuration.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Logging and metrics configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// `path` defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. Unset or empty
/// variables without a default become empty strings.
#[allow(clippy::expect_used)] // constant pattern
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let persistence = &config.persistence;

    if !persistence.database_url.starts_with("sqlite:") {
        return Err(ConfigError::ValidationError(format!(
            "persistence.database_url must be a sqlite: URL (got '{}')",
            persistence.database_url
        )));
    }

    if persistence.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "persistence.max_connections must be positive".to_string(),
        ));
    }

    for (name, value) in [
        ("acquire_timeout_ms", persistence.acquire_timeout_ms),
        ("busy_timeout_ms", persistence.busy_timeout_ms),
        ("transaction_timeout_ms", persistence.transaction_timeout_ms),
    ] {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!(
                "persistence.{name} must be positive"
            )));
        }
    }

    let valid_formats = ["json", "pretty"];
    let format = config.observability.logging.format.as_str();
    if !valid_formats.contains(&format) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    let metrics = &config.observability.metrics;
    if metrics.enabled && metrics.listen_addr.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "observability.metrics.listen_addr is not a socket address: '{}'",
            metrics.listen_addr
        )));
    }

    Ok(())
}
