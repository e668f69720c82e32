//! Entity Identifiers
//!
//! Ids are random v4 UUIDs rendered as strings. They are stored as plain
//! strings so snapshots written by other clients still decode.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh, never reused id
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
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

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a [`Stack`](super::Stack)
    StackId
);

string_id!(
    /// Identifier of a [`Card`](super::Card)
    CardId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = StackId::generate();
        let b = StackId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = CardId::from("card-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"card-1\"");
        let back: CardId = serde_json::from_str("\"card-1\"").unwrap();
        assert_eq!(back, id);
    }
}
