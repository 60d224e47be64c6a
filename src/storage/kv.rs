//! Key-value store over a single persisted JSON document

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, trace, warn};

use super::error::{StorageError, StorageResult};
use super::traits::DataStore;

type Cache = Map<String, Value>;

/// Flat string-keyed store persisted as `{"state": {...}}` through a [`DataStore`].
///
/// The backing document is loaded once, on first access, and from then on the
/// in-memory cache is the source of truth. Concurrent first callers share a
/// single in-flight load. Every mutation rewrites the whole document.
///
/// There is no write ordering between concurrent mutations: two `set` calls
/// racing each other both update the cache, but whichever `save_data`
/// finishes last decides what is on disk.
pub struct KeyValueStore {
    store: Arc<dyn DataStore>,
    cache: OnceCell<RwLock<Cache>>,
}

impl KeyValueStore {
    /// Create a store over the given data store
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            cache: OnceCell::new(),
        }
    }

    /// Extract the `state` mapping from a loaded document
    fn state_of(data: Value) -> Cache {
        match data {
            Value::Object(mut doc) => match doc.remove("state") {
                Some(Value::Object(state)) => state,
                Some(Value::Null) | None => Cache::new(),
                Some(other) => {
                    warn!("Ignoring non-object state in data store: {}", other);
                    Cache::new()
                }
            },
            _ => Cache::new(),
        }
    }

    async fn ensure_cache(&self) -> StorageResult<&RwLock<Cache>> {
        self.cache
            .get_or_try_init(|| async {
                let data = self.store.load_data().await?;
                let state = Self::state_of(data);
                debug!("Loaded {} state entries", state.len());
                Ok::<_, StorageError>(RwLock::new(state))
            })
            .await
    }

    async fn persist(&self, snapshot: Cache) -> StorageResult<()> {
        trace!("Persisting {} state entries", snapshot.len());
        self.store.save_data(&json!({ "state": snapshot })).await
    }

    /// Get a value by key, `None` if the key is not present
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let cache = self.ensure_cache().await?;
        let value = cache.read().await.get(key).cloned();
        value
            .map(|v| serde_json::from_value(v).map_err(StorageError::serialization))
            .transpose()
    }

    /// Set a value by key and persist the whole document
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let value = serde_json::to_value(value)?;
        let cache = self.ensure_cache().await?;
        let snapshot = {
            let mut cache = cache.write().await;
            cache.insert(key.to_string(), value);
            cache.clone()
        };
        self.persist(snapshot).await
    }

    /// Check if a key exists in the store
    pub async fn has(&self, key: &str) -> StorageResult<bool> {
        let cache = self.ensure_cache().await?;
        let present = cache.read().await.contains_key(key);
        Ok(present)
    }

    /// Delete a key, returning whether it existed.
    ///
    /// Deleting a missing key does not touch the backing store.
    pub async fn delete(&self, key: &str) -> StorageResult<bool> {
        let cache = self.ensure_cache().await?;
        let snapshot = {
            let mut cache = cache.write().await;
            if cache.remove(key).is_none() {
                return Ok(false);
            }
            cache.clone()
        };
        self.persist(snapshot).await?;
        Ok(true)
    }

    /// Remove every key and persist the empty document
    pub async fn clear(&self) -> StorageResult<()> {
        let cache = self.ensure_cache().await?;
        cache.write().await.clear();
        self.persist(Cache::new()).await
    }

    /// All keys in the store
    pub async fn keys(&self) -> StorageResult<Vec<String>> {
        let cache = self.ensure_cache().await?;
        let keys = cache.read().await.keys().cloned().collect();
        Ok(keys)
    }

    /// All values in the store
    pub async fn values<T: DeserializeOwned>(&self) -> StorageResult<Vec<T>> {
        let cache = self.ensure_cache().await?;
        let values: Vec<Value> = cache.read().await.values().cloned().collect();
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(StorageError::serialization))
            .collect()
    }

    /// All `(key, value)` pairs in the store
    pub async fn entries<T: DeserializeOwned>(&self) -> StorageResult<Vec<(String, T)>> {
        let cache = self.ensure_cache().await?;
        let entries: Vec<(String, Value)> = cache
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries
            .into_iter()
            .map(|(k, v)| {
                serde_json::from_value(v)
                    .map(|v| (k, v))
                    .map_err(StorageError::serialization)
            })
            .collect()
    }
}

impl std::fmt::Debug for KeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyValueStore")
            .field("initialized", &self.cache.initialized())
            .finish()
    }
}
