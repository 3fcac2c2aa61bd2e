//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - `persistence/`: SQLite (`SQLx`) and in-memory warehouse stores
//! - `config/`: dependency injection container

pub mod config;
pub mod persistence;
