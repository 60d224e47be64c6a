//! Shared state plumbing for stateful widgets

use serde::{de::DeserializeOwned, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::error::{ErrorCode, Result, ToolkitError};
use crate::storage::KeyValueStore;

/// Return the block's `state_key`, or the configuration error shown in place
/// of the widget when it has none
pub(crate) fn require_state_key(state_key: Option<&str>, widget: &str) -> Result<String> {
    match state_key.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(ToolkitError::missing_field(
            "state_key",
            format!("The {widget} block requires a 'state_key' property"),
        )),
    }
}

/// In-memory copy of one widget's persisted state.
///
/// Interactions update it and write through before returning. Reset events
/// arrive inside synchronous bus callbacks, so they update it immediately
/// and queue the write on the runtime the widget was mounted on.
pub(crate) struct StateCell<S> {
    kv: Arc<KeyValueStore>,
    state_key: String,
    state: Arc<Mutex<S>>,
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
    runtime: Handle,
}

impl<S> Clone for StateCell<S> {
    fn clone(&self) -> Self {
        Self {
            kv: self.kv.clone(),
            state_key: self.state_key.clone(),
            state: self.state.clone(),
            pending: self.pending.clone(),
            runtime: self.runtime.clone(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S> StateCell<S>
where
    S: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Load the persisted state for `state_key`.
    ///
    /// Missing state is replaced by `default` and persisted. State that
    /// cannot be read falls back to `default` without overwriting it.
    pub(crate) async fn load(
        kv: Arc<KeyValueStore>,
        state_key: String,
        default: impl FnOnce() -> S,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            ToolkitError::event(
                ErrorCode::EVENT_NO_RUNTIME,
                "Widgets must be mounted inside a tokio runtime",
                None,
            )
            .with_source(e)
        })?;

        let state = match kv.get::<S>(&state_key).await {
            Ok(Some(state)) => state,
            Ok(None) => {
                let state = default();
                debug!("Initializing default state for {}", state_key);
                if let Err(e) = kv.set(&state_key, &state).await {
                    error!("Failed to persist default state for {}: {}", state_key, e);
                }
                state
            }
            Err(e) => {
                warn!("Failed to load state for {}, using default: {}", state_key, e);
                default()
            }
        };

        Ok(Self {
            kv,
            state_key,
            state: Arc::new(Mutex::new(state)),
            pending: Arc::new(Mutex::new(Vec::new())),
            runtime,
        })
    }

    pub(crate) fn state_key(&self) -> &str {
        &self.state_key
    }

    pub(crate) fn get(&self) -> S {
        lock(&self.state).clone()
    }

    fn replace(&self, update: impl FnOnce(&S) -> S) -> S {
        let mut state = lock(&self.state);
        *state = update(&state);
        state.clone()
    }

    /// Apply a user interaction and persist the result.
    ///
    /// A failed write leaves the new state in memory and is returned to the
    /// caller.
    pub(crate) async fn update(&self, update: impl FnOnce(&S) -> S) -> Result<S> {
        let next = self.replace(update);
        self.kv.set(&self.state_key, &next).await?;
        Ok(next)
    }

    /// Apply a reset from inside a bus callback and queue the write
    pub(crate) fn apply_reset(&self, update: impl FnOnce(&S) -> S) {
        self.replace(update);

        let kv = self.kv.clone();
        let state_key = self.state_key.clone();
        let state = self.state.clone();
        let handle = self.runtime.spawn(async move {
            let snapshot = lock(&state).clone();
            if let Err(e) = kv.set(&state_key, &snapshot).await {
                error!("Failed to persist reset state for {}: {}", state_key, e);
            }
        });
        let mut pending = lock(&self.pending);
        pending.retain(|queued| !queued.is_finished());
        pending.push(handle);
    }

    /// Wait for every queued write to finish
    pub(crate) async fn flush(&self) {
        let handles = std::mem::take(&mut *lock(&self.pending));
        for handle in handles {
            if let Err(e) = handle.await {
                warn!("State write for {} did not complete: {}", self.state_key, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDataStore;
    use std::time::Duration;

    async fn wait_for_writes(cell: &StateCell<u32>) {
        for _ in 0..100 {
            if lock(&cell.pending).iter().all(JoinHandle::is_finished) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("queued writes did not finish");
    }

    #[tokio::test]
    async fn test_finished_reset_writes_are_pruned() {
        let kv = Arc::new(KeyValueStore::new(Arc::new(MemoryDataStore::new())));
        let cell = StateCell::load(kv.clone(), "ki".to_string(), || 3u32).await.unwrap();

        for used in 0..10u32 {
            cell.apply_reset(|_| used);
            wait_for_writes(&cell).await;
        }

        assert_eq!(lock(&cell.pending).len(), 1);
        assert_eq!(kv.get::<u32>("ki").await.unwrap(), Some(9));

        cell.flush().await;
        assert!(lock(&cell.pending).is_empty());
    }
}
