//! Core trait definitions for the storage layer

use async_trait::async_trait;
use serde_json::Value;

use super::error::StorageResult;

/// A persistence medium holding one JSON document.
///
/// The key-value store reads the document once and writes the whole thing
/// back on every mutation, so implementations only need whole-document
/// load and save.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Load the stored document. `Value::Null` means nothing has been stored yet.
    async fn load_data(&self) -> StorageResult<Value>;

    /// Replace the stored document
    async fn save_data(&self, data: &Value) -> StorageResult<()>;
}

#[async_trait]
impl<T: DataStore + ?Sized> DataStore for std::sync::Arc<T> {
    async fn load_data(&self) -> StorageResult<Value> {
        (**self).load_data().await
    }

    async fn save_data(&self, data: &Value) -> StorageResult<()> {
        (**self).save_data(data).await
    }
}
