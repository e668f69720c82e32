//! Repository Layer
//!
//! Persists whole dock snapshots behind a key-value storage trait.
//! The adapter subscribes to the store, so mutation code never touches storage.

mod adapter;
mod codec;
mod file_storage;
mod memory_storage;
mod traits;


pub use adapter::PersistenceAdapter;
pub use codec::{decode_snapshot, encode_snapshot, SNAPSHOT_VERSION};
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
pub use traits::SnapshotStorage;
