//! Persistence Adapter
//!
//! Loads the initial snapshot and writes the whole snapshot back after every
//! persistent store change. Storage failures are logged, never raised: a
//! broken read starts from an empty dock, a broken write is skipped.

use log::{debug, error, warn};

use super::codec::{decode_snapshot, encode_snapshot};
use super::traits::SnapshotStorage;
use crate::domain::DomainResult;
use crate::state::DockState;
use crate::store::{EntityStore, SubscriptionId};

pub struct PersistenceAdapter<S: SnapshotStorage> {
    storage: S,
    key: String,
}

impl<S: SnapshotStorage + 'static> PersistenceAdapter<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read and decode the stored snapshot, propagating failures
    pub fn try_load(&self) -> DomainResult<Option<DockState>> {
        match self.storage.load(&self.key)? {
            Some(raw) => Ok(Some(decode_snapshot(&raw)?)),
            None => Ok(None),
        }
    }

    /// Stored snapshot, or an empty state when missing or unreadable
    pub fn load_or_default(&self) -> DockState {
        match self.try_load() {
            Ok(Some(state)) => {
                debug!(
                    "Loaded {} stacks and {} cards from {:?}",
                    state.stacks.len(),
                    state.all_cards.len(),
                    self.key
                );
                state
            }
            Ok(None) => DockState::default(),
            Err(e) => {
                warn!("Falling back to empty dock state, could not load {:?}: {}", self.key, e);
                DockState::default()
            }
        }
    }

    /// Encode and write one snapshot
    pub fn save(&mut self, state: &DockState) -> DomainResult<()> {
        let raw = encode_snapshot(state)?;
        self.storage.save(&self.key, &raw)
    }

    /// Build a store from the stored snapshot and keep storage in sync with it
    pub fn open_store(self) -> (EntityStore, SubscriptionId) {
        let mut store = EntityStore::with_state(self.load_or_default());
        let sub = self.attach(&mut store);
        (store, sub)
    }

    /// Subscribe to `store`; the adapter moves into the subscription
    pub fn attach(mut self, store: &mut EntityStore) -> SubscriptionId {
        store.subscribe(move |state, change| {
            if !change.is_persistent() {
                return;
            }
            if let Err(e) = self.save(state) {
                error!("Failed to persist dock state to {:?}: {}", self.key, e);
            }
        })
    }
}
