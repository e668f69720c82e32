//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all domain entities.
//! All entities must have a unique ID.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core trait for all domain entities
pub trait Entity: Sized + Clone {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + std::hash::Hash;

    /// Returns the entity's unique identifier
    fn id(&self) -> &Self::Id;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum DomainError {
    /// User-entered fields rejected before any mutation
    #[error("Invalid input: {0}")]
    Validation(String),
    /// A mutation referenced an id that is not in the current state
    #[error("Not found: {0}")]
    NotFound(String),
    /// The interaction layer is busy with another operation
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Serialization or storage failure
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Persistence(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::NotFound("stack abc".to_string());
        assert_eq!(err.to_string(), "Not found: stack abc");
        let err = DomainError::Validation("title is empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: title is empty");
    }

    #[test]
    fn test_json_error_maps_to_persistence() {
        let err: DomainError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, DomainError::Persistence(_)));
    }
}
