//! Storage setup and initialization

use anyhow::Result;
use pholio_core::Config;
use pholio_storage::{BlobStore, LocalStorage};
use std::sync::Arc;

/// Setup the blob storage backend.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn BlobStore>> {
    tracing::info!(path = %config.local_storage_path, "Initializing blob storage...");
    let storage = LocalStorage::new(&config.local_storage_path).await?;
    tracing::info!("Blob storage initialized successfully");
    Ok(Arc::new(storage))
}
