//! Browser Storage
//!
//! `localStorage` backend for the snapshot. A page without storage access
//! (privacy mode, sandboxed iframe) reads as empty and fails writes, which
//! the persistence adapter logs and ignores.

use stack_dock::domain::{DomainError, DomainResult};
use stack_dock::repository::SnapshotStorage;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

fn js_err(e: JsValue) -> DomainError {
    DomainError::Persistence(format!("{:?}", e))
}

impl BrowserStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> DomainResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| DomainError::Persistence("no window".to_string()))?
            .local_storage()
            .map_err(js_err)?
            .ok_or_else(|| DomainError::Persistence("localStorage unavailable".to_string()))
    }
}

impl SnapshotStorage for BrowserStorage {
    fn load(&self, key: &str) -> DomainResult<Option<String>> {
        self.storage()?.get_item(key).map_err(js_err)
    }

    fn save(&mut self, key: &str, value: &str) -> DomainResult<()> {
        self.storage()?.set_item(key, value).map_err(js_err)
    }

    fn remove(&mut self, key: &str) -> DomainResult<()> {
        self.storage()?.remove_item(key).map_err(js_err)
    }
}
