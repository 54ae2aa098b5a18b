//! Application state shared across handlers.

use pholio_core::Config;
use pholio_db::PhotoStore;
use pholio_storage::BlobStore;
use std::sync::Arc;

/// Shared application state.
///
/// Both stores are trait objects so integration tests can run the full HTTP
/// surface against a tempdir blob store and an in-memory metadata store.
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn BlobStore>,
    pub photos: Arc<dyn PhotoStore>,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn BlobStore>, photos: Arc<dyn PhotoStore>) -> Self {
        Self {
            config,
            storage,
            photos,
        }
    }
}
