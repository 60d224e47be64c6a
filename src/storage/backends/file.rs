//! JSON file backed data store

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error};

use crate::storage::{
    error::{StorageError, StorageResult},
    traits::DataStore,
};

/// Data store keeping the whole document in a single pretty-printed JSON file.
///
/// Reads never fail: a missing file is created with `{}` and an unreadable or
/// corrupt file is treated as empty. Writes overwrite the file in place, so a
/// crash mid-write can leave a truncated file behind, which the next load
/// then reads as empty.
#[derive(Debug, Clone)]
pub struct JsonDataStore {
    path: PathBuf,
}

impl JsonDataStore {
    /// Create a store for the JSON file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::file(parent, e))?;
            }
        }
        Ok(())
    }

    async fn write_document(&self, data: &Value) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(data)?;
        self.ensure_parent_dir().await?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| StorageError::file(&self.path, e))
    }

    async fn read_document(&self) -> StorageResult<Value> {
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| StorageError::file(&self.path, e))?;
        serde_json::from_str(&content).map_err(StorageError::serialization)
    }
}

#[async_trait]
impl DataStore for JsonDataStore {
    async fn load_data(&self) -> StorageResult<Value> {
        let exists = match fs::try_exists(&self.path).await {
            Ok(exists) => exists,
            Err(e) => {
                error!("Error loading data from {}: {}", self.path.display(), e);
                return Ok(Value::Object(Default::default()));
            }
        };

        if !exists {
            debug!("State file {} missing, creating it", self.path.display());
            let empty = Value::Object(Default::default());
            if let Err(e) = self.write_document(&empty).await {
                error!("Error loading data from {}: {}", self.path.display(), e);
            }
            return Ok(empty);
        }

        match self.read_document().await {
            Ok(data) => Ok(data),
            Err(e) => {
                error!("Error loading data from {}: {}", self.path.display(), e);
                Ok(Value::Object(Default::default()))
            }
        }
    }

    async fn save_data(&self, data: &Value) -> StorageResult<()> {
        self.write_document(data).await.map_err(|e| {
            error!("Error saving data to {}: {}", self.path.display(), e);
            e
        })
    }
}
