//! Strongly-typed identifiers for domain entities.
//!
//! Storage assigns integer keys starting at 1. The newtypes keep a product id
//! from being passed where a warehouse id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new identifier from its storage key.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Get the storage key.
            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }

            /// Returns true if this could be a storage-assigned key (strictly positive).
            #[must_use]
            pub const fn is_valid(&self) -> bool {
                self.0 > 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id!(ProductId, "Identifier of a catalog product.");
define_id!(WarehouseId, "Identifier of a warehouse.");
define_id!(OrderId, "Identifier of a stock order awaiting fulfillment.");
define_id!(
    StockMovementId,
    "Identifier of a recorded stock movement (product-warehouse-order row)."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_new_and_display() {
        let id = OrderId::new(5);
        assert_eq!(id.value(), 5);
        assert_eq!(format!("{id}"), "5");
    }

    #[test]
    fn ids_validity() {
        assert!(ProductId::new(1).is_valid());
        assert!(!ProductId::new(0).is_valid());
        assert!(!WarehouseId::new(-3).is_valid());
    }

    #[test]
    fn ids_order_by_key() {
        assert!(OrderId::new(2) < OrderId::new(10));
    }

    #[test]
    fn conversions() {
        let id: StockMovementId = 42.into();
        let raw: i64 = id.into();
        assert_eq!(raw, 42);
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&WarehouseId::new(7)).unwrap();
        assert_eq!(json, "7");

        let parsed: WarehouseId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, WarehouseId::new(7));
    }

    #[test]
    fn hash_works_for_collections() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(OrderId::new(1));
        set.insert(OrderId::new(2));
        set.insert(OrderId::new(1)); // duplicate

        assert_eq!(set.len(), 2);
    }
}
