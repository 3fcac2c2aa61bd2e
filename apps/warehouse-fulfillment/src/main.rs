//! Warehouse Fulfillment Binary
//!
//! Prepares the fulfillment store: loads configuration, opens the SQLite
//! database, applies the schema and reports readiness.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin warehouse-fulfillment
//! ```
//!
//! # Environment Variables
//!
//! - `WAREHOUSE_CONFIG`: Path to the YAML config (default: `config.yaml` if present)
//! - `RUST_LOG`: Log filter (overrides `observability.logging.level`)
//!
//! Any `${VAR}` referenced by the config file is read from the environment,
//! including values loaded from `.env`.
//!
//! The binary runs once and exits, so it does not start the metrics exporter.
//! Long-running hosts call `observability::init_metrics` themselves.

use std::path::Path;

use anyhow::Context;
use warehouse_fulfillment::Container;
use warehouse_fulfillment::config::{Config, PersistenceConfig, load_config};
use warehouse_fulfillment::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = resolve_config()?;
    init_tracing(&config.observability.logging)?;

    tracing::info!("Starting warehouse fulfillment engine");

    ensure_database_dir(&config.persistence)?;
    let container = Container::sqlite(config)
        .await
        .context("failed to open warehouse store")?;

    let movements = container.store().count_movements().await?;
    let persistence = &container.config().persistence;
    tracing::info!(
        database_url = %persistence.database_url,
        transaction_timeout_ms = persistence.transaction_timeout_ms,
        stock_movements = movements,
        "Warehouse fulfillment engine ready"
    );

    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Config from `WAREHOUSE_CONFIG`, else `config.yaml`, else defaults.
fn resolve_config() -> anyhow::Result<Config> {
    if let Ok(path) = std::env::var("WAREHOUSE_CONFIG") {
        return load_config(Some(&path)).with_context(|| format!("loading {path}"));
    }
    if Path::new("config.yaml").exists() {
        return Ok(load_config(None)?);
    }
    Ok(Config::default())
}

/// SQLite creates the file but not its parent directory.
fn ensure_database_dir(persistence: &PersistenceConfig) -> anyhow::Result<()> {
    if persistence.is_in_memory() || !persistence.create_if_missing {
        return Ok(());
    }

    let path = persistence
        .database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating database directory {}", parent.display()))?;
    }
    Ok(())
}
