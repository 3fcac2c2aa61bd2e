//! Predicate an order must satisfy to be fulfilled by a request.

use serde::{Deserialize, Serialize};

use crate::domain::inventory::aggregate::Order;
use crate::domain::shared::{ProductId, Quantity, Timestamp};

/// Match predicate: same product, same amount, created strictly before the
/// request time.
///
/// Fulfillment state is deliberately not part of the predicate; the matcher
/// ranks pending orders first and the idempotency guard rejects fulfilled ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMatchCriteria {
    /// Requested product.
    pub product_id: ProductId,
    /// Requested amount; must equal the ordered amount.
    pub amount: Quantity,
    /// Request time; the order must be strictly older.
    pub created_before: Timestamp,
}

impl OrderMatchCriteria {
    /// Create match criteria.
    #[must_use]
    pub const fn new(product_id: ProductId, amount: Quantity, created_before: Timestamp) -> Self {
        Self {
            product_id,
            amount,
            created_before,
        }
    }

    /// Returns true if the order satisfies the predicate.
    #[must_use]
    pub fn is_satisfied_by(&self, order: &Order) -> bool {
        order.product_id() == self.product_id
            && order.amount() == self.amount
            && order.created_at() < self.created_before
    }
}
