//! State storage layer
//!
//! Widget state lives in one flat key-value namespace persisted as a single
//! JSON document of the form `{"state": {<key>: <value>, ...}}`. The
//! [`KeyValueStore`] caches that mapping in memory and writes it back through
//! a [`DataStore`] on every mutation.

pub mod backends;
pub mod error;
pub mod kv;
pub mod traits;

#[cfg(test)]
mod tests;

pub use backends::{JsonDataStore, MemoryDataStore};
pub use error::{StorageError, StorageResult};
pub use kv::KeyValueStore;
pub use traits::DataStore;

use std::path::Path;
use std::sync::Arc;

/// Open a key-value store backed by the JSON state file at `path`
pub fn open_state_file(path: impl AsRef<Path>) -> KeyValueStore {
    let store: Arc<dyn DataStore> = Arc::new(JsonDataStore::new(path.as_ref()));
    KeyValueStore::new(store)
}
