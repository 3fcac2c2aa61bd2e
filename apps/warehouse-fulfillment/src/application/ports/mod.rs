//! Application Ports (Driver and Driven)
//!
//! - **Driver Ports** (Primary/Inbound): how callers trigger a fulfillment
//! - **Driven Ports** (Secondary/Outbound): how fulfillment reaches storage

mod fulfillment_service_port;
mod warehouse_store_port;

pub use fulfillment_service_port::FulfillmentService;
pub use warehouse_store_port::{StorageError, WarehouseStore, WarehouseTransaction};
