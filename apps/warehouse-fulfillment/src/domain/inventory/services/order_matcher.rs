//! Order Matcher
//!
//! Picks the single order a fulfillment request applies to.
//!
//! Ranking among orders satisfying [`OrderMatchCriteria`]:
//! 1. pending before fulfilled
//! 2. oldest `created_at` first
//! 3. lowest id first
//!
//! A fulfilled order is only returned when no pending order matches, so that
//! repeating a request reaches the idempotency guard instead of looking like a
//! missing order.

use crate::domain::inventory::aggregate::Order;
use crate::domain::inventory::value_objects::OrderMatchCriteria;

/// Stateless order matching service.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderMatcher;

impl OrderMatcher {
    /// Create a matcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Select the order to fulfil, or `None` if nothing satisfies the criteria.
    #[must_use]
    pub fn select(&self, criteria: &OrderMatchCriteria, candidates: Vec<Order>) -> Option<Order> {
        candidates
            .into_iter()
            .filter(|order| criteria.is_satisfied_by(order))
            .min_by_key(|order| (order.is_fulfilled(), order.created_at(), order.id()))
    }
}
