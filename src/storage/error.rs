//! Error types for the state storage layer

use crate::error::{ErrorCode, ToolkitError};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O operation on a specific file failed
    #[error("I/O error on {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic error wrapper
    #[error("Storage error: {0}")]
    Other(#[from] anyhow::Error),
}

impl StorageError {
    /// Create a serialization error
    pub fn serialization<E: fmt::Display>(err: E) -> Self {
        Self::Serialization(err.to_string())
    }

    /// Create a not found error
    pub fn not_found<E: fmt::Display>(item: E) -> Self {
        Self::NotFound(item.to_string())
    }

    /// Attach the file path an I/O error happened on
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err)
    }
}

/// Convert StorageError to ToolkitError
impl From<StorageError> for ToolkitError {
    fn from(err: StorageError) -> Self {
        let (code, path) = match &err {
            StorageError::Io(_) => (ErrorCode::STORAGE_IO_ERROR, None),
            StorageError::File { path, .. } => (ErrorCode::STORAGE_IO_ERROR, Some(path.clone())),
            StorageError::Serialization(_) => (ErrorCode::STORAGE_SERIALIZATION_ERROR, None),
            StorageError::NotFound(_) => (ErrorCode::STORAGE_NOT_FOUND, None),
            StorageError::Other(_) => (ErrorCode::STORAGE_GENERIC, None),
        };

        ToolkitError::storage_with_code(code, err.to_string(), path).with_source(err)
    }
}
