//! Order status in the fulfillment lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status.
///
/// The only transition is `Pending -> Fulfilled`. `Fulfilled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created externally, waiting for stock to be moved.
    Pending,
    /// Stock movement recorded; fulfillment time is set.
    Fulfilled,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Fulfilled)
    }

    /// Returns true if `self -> to` is an allowed transition.
    #[must_use]
    pub const fn can_transition_to(&self, to: Self) -> bool {
        matches!((self, to), (Self::Pending, Self::Fulfilled))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Fulfilled => "FULFILLED",
        };
        write!(f, "{s}")
    }
}
