//! Data Transfer Objects

mod fulfillment_dto;

pub use fulfillment_dto::{FulfillOrderRequestDto, FulfillOrderResponseDto};
