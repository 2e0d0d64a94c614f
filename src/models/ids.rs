//! Strongly-typed ID wrappers for all entity types
//!
//! YNAB4 identifiers are opaque strings namespaced by entity kind
//! (e.g. `Category/A1B2...`, `Payee/Transfer:...`). Wrapping them keeps
//! account ids from being passed where a category id is expected.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Macro to generate string-backed ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from any string-like value
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(AccountId);
define_id!(TransactionId);
define_id!(CategoryId);
define_id!(MasterCategoryId);
define_id!(PayeeId);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_display() {
        let id = CategoryId::new("Category/ABC");
        assert_eq!(id.to_string(), "Category/ABC");
        assert_eq!(id.as_str(), "Category/ABC");
    }

    #[test]
    fn test_id_serialization_is_transparent() {
        let id = AccountId::from("Account/1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Account/1\"");
        let deserialized: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_set_lookup_by_str() {
        let mut ids = HashSet::new();
        ids.insert(CategoryId::from("Category/A"));
        assert!(ids.contains("Category/A"));
        assert!(!ids.contains("Category/B"));
    }
}
