//! Repository Layer - Core Traits
//!
//! Defines the abstract interface for snapshot storage.
//! Implementations can use a file, memory, browser localStorage, etc.

use crate::domain::DomainResult;

/// String key-value storage, shaped like the browser's `localStorage`
pub trait SnapshotStorage {
    /// Read the value stored under `key`, `None` if absent
    fn load(&self, key: &str) -> DomainResult<Option<String>>;

    /// Replace the value stored under `key`
    fn save(&mut self, key: &str, value: &str) -> DomainResult<()>;

    /// Drop the value stored under `key`
    fn remove(&mut self, key: &str) -> DomainResult<()>;
}

impl<S: SnapshotStorage + ?Sized> SnapshotStorage for Box<S> {
    fn load(&self, key: &str) -> DomainResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> DomainResult<()> {
        (**self).save(key, value)
    }

    fn remove(&mut self, key: &str) -> DomainResult<()> {
        (**self).remove(key)
    }
}
