//! Typed IDs for type-safe entity references.
//!
//! Document stores hand out opaque string keys, so every ID wraps a `String`.
//! Using typed IDs prevents accidentally passing a `UserId` where a `GroupId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate string-backed typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generates a fresh ID from a UUID v7 (time-ordered).
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Wraps an existing opaque key.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

typed_id!(TransactionId, "Unique identifier for a transaction document.");
typed_id!(UserId, "Identifier issued by the auth provider for a signed-in user.");
typed_id!(GroupId, "Identifier of a family group sharing one collection.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = TransactionId::generate();
        let b = TransactionId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_display_matches_inner() {
        let id = UserId::new("uid-42");
        assert_eq!(id.to_string(), "uid-42");
        assert_eq!(id.into_inner(), "uid-42");
    }

    #[test]
    fn test_ordering_follows_key() {
        let mut ids = vec![TransactionId::from("b"), TransactionId::from("a")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "a");
    }
}
