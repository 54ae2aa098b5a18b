//! Storage abstraction trait
//!
//! This module defines the BlobStore trait that storage backends implement.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Blob storage abstraction
///
/// The photo pipeline works against this trait so the backend can be swapped
/// without touching handlers or services. Photos are small (bounded at upload
/// time), so the API is whole-buffer rather than streaming.
///
/// **Key format:** `uploads/{millis}-{filename}`. See the crate root
/// documentation.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write a blob under the given storage key, replacing any existing blob.
    async fn put(&self, storage_key: &str, data: Bytes) -> StorageResult<()>;

    /// Read a blob by its storage key.
    ///
    /// Returns `StorageError::NotFound` when no blob exists under the key.
    async fn get(&self, storage_key: &str) -> StorageResult<Bytes>;

    /// Delete a blob by its storage key.
    ///
    /// Deleting a key that does not exist is a no-op, so retries after a
    /// partial failure converge.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check whether a blob exists under the given key.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;
}
