//! In-memory Storage
//!
//! Clones share the same map, so a caller can keep a handle while the
//! persistence adapter owns another.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::traits::SnapshotStorage;
use crate::domain::DomainResult;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value under `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Seed a raw value, bypassing the codec
    pub fn insert(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, value: &str) -> DomainResult<()> {
        self.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DomainResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
