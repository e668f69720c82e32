//! Snapshot Codec
//!
//! Persisted layout: `{"state": {theme, stacks, allCards}, "version": 0}`.
//! A bare state object without the envelope is accepted on read.

use serde::{Deserialize, Serialize};

use crate::domain::DomainResult;
use crate::state::DockState;

pub const SNAPSHOT_VERSION: u32 = 0;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a DockState,
    version: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Envelope {
        state: DockState,
        #[serde(default)]
        version: u32,
    },
    Bare(DockState),
}

pub fn encode_snapshot(state: &DockState) -> DomainResult<String> {
    Ok(serde_json::to_string(&EnvelopeRef {
        state,
        version: SNAPSHOT_VERSION,
    })?)
}

/// Decode a stored snapshot. The result is not yet checked for integrity.
pub fn decode_snapshot(raw: &str) -> DomainResult<DockState> {
    match serde_json::from_str::<Stored>(raw)? {
        Stored::Envelope { state, version } => {
            if version != SNAPSHOT_VERSION {
                log::warn!("Snapshot version {} differs from {}, decoding anyway", version, SNAPSHOT_VERSION);
            }
            Ok(state)
        }
        Stored::Bare(state) => Ok(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, Theme};

    #[test]
    fn test_encode_uses_envelope() {
        let state = DockState {
            theme: Theme::Dark,
            ..Default::default()
        };
        let raw = encode_snapshot(&state).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 0);
        assert_eq!(value["state"]["theme"], "dark");
        assert!(value["state"]["allCards"].is_array());
    }

    #[test]
    fn test_decode_bare_state() {
        let state = decode_snapshot(r#"{"theme": "light", "stacks": [], "allCards": []}"#).unwrap();
        assert_eq!(state.theme, Theme::Light);
    }

    #[test]
    fn test_decode_garbage_is_persistence_error() {
        assert!(matches!(decode_snapshot("{{{"), Err(DomainError::Persistence(_))));
        assert!(matches!(decode_snapshot("[1, 2]"), Err(DomainError::Persistence(_))));
    }
}
