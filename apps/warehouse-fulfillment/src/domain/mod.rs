//! Domain Layer
//!
//! Pure business logic with no I/O.
//!
//! # Bounded Contexts
//!
//! - `inventory`: orders, stock movements and order matching
//! - `shared`: identifiers and value objects used across contexts

pub mod inventory;
pub mod shared;
