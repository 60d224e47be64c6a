//! In-memory data store for testing

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::storage::{
    error::{StorageError, StorageResult},
    traits::DataStore,
};

/// In-memory data store.
///
/// Starts out holding `Value::Null`, the same as a host that has never
/// saved anything. Counts loads and saves so tests can observe how often the
/// key-value store goes to its backing medium.
#[derive(Debug, Default)]
pub struct MemoryDataStore {
    data: RwLock<Value>,
    loads: AtomicUsize,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryDataStore {
    /// Create an empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store pre-populated with a document
    pub fn with_data(data: Value) -> Self {
        Self {
            data: RwLock::new(data),
            ..Self::default()
        }
    }

    /// Snapshot of the currently stored document
    pub async fn data(&self) -> Value {
        self.data.read().await.clone()
    }

    /// Number of `load_data` calls served
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Number of successful `save_data` calls
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make every subsequent save fail, simulating a full disk
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn load_data(&self) -> StorageResult<Value> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.read().await.clone())
    }

    async fn save_data(&self, data: &Value) -> StorageResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other(
                "simulated write failure",
            )));
        }
        *self.data.write().await = data.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
