//! Catalog product as seen by fulfillment.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, ProductId};

/// A product and its unit price. Read-only during fulfillment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Price of one unit.
    pub unit_price: Money,
}

impl Product {
    /// Create a product.
    #[must_use]
    pub const fn new(id: ProductId, unit_price: Money) -> Self {
        Self { id, unit_price }
    }
}
