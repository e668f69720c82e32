//! Dock Configuration
//!
//! Every field has a default so a partial JSON object is enough.

use serde::{Deserialize, Serialize};

use crate::domain::DomainResult;
use crate::projector::DEFAULT_DISPLAY_DEPTH;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockConfig {
    /// Storage identifier the snapshot is written under
    pub storage_key: String,
    /// How many cards of the deck are rendered
    pub display_depth: usize,
    pub title_max_len: usize,
    pub description_max_len: usize,
    /// Pointer travel before a press on the top card becomes a drag
    pub drag_activation_px: f64,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            storage_key: "wishlist-storage".to_string(),
            display_depth: DEFAULT_DISPLAY_DEPTH,
            title_max_len: 40,
            description_max_len: 100,
            drag_activation_px: 5.0,
        }
    }
}

impl DockConfig {
    pub fn from_json_str(raw: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
