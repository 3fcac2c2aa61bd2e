//! Application Layer
//!
//! Orchestrates the domain against storage through ports.
//!
//! # Structure
//!
//! - `ports/`: driver and driven port traits
//! - `use_cases/`: application services
//! - `dto/`: request/response shapes for boundary layers
//! - `errors`: fulfillment failures and their error codes

pub mod dto;
pub mod errors;
pub mod ports;
pub mod use_cases;

pub use errors::{FulfillmentError, MissingEntity};
