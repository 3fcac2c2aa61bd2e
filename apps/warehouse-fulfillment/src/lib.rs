// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Warehouse Fulfillment - Rust Core Library
//!
//! Records, exactly once per order, that ordered stock has been moved into a
//! warehouse.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `inventory`: Order aggregate, stock movements, order matching
//!   - `shared`: identifiers, money, quantities, timestamps
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `WarehouseStore` / `WarehouseTransaction` (driven),
//!     `FulfillmentService` (driver)
//!   - `use_cases`: `FulfillOrder`
//!   - `dto`: request/response shapes for boundary layers
//!
//! - **Infrastructure**: Adapters
//!   - `persistence`: SQLite (`SQLx`) and in-memory stores
//!   - `config`: dependency injection container
//!
//! # Guarantees
//!
//! - A fulfillment either commits the order update and the stock movement
//!   together, or writes nothing
//! - At most one stock movement exists per order, enforced by storage
//! - Total prices are exact decimals

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Boundary error codes.
pub mod error;

/// Metrics.
pub mod observability;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::dto::{FulfillOrderRequestDto, FulfillOrderResponseDto};
pub use application::ports::{FulfillmentService, StorageError, WarehouseStore};
pub use application::use_cases::{FulfillOrderCommand, FulfillOrderUseCase, FulfillmentReceipt};
pub use application::{FulfillmentError, MissingEntity};
pub use domain::inventory::{Order, OrderStatus, StockMovement};
pub use domain::shared::{
    Money, OrderId, ProductId, Quantity, StockMovementId, Timestamp, WarehouseId,
};
pub use error::{ErrorCode, HttpErrorResponse, ServiceError};
pub use infrastructure::config::Container;
pub use infrastructure::persistence::{InMemoryWarehouseStore, SqliteWarehouseStore};
