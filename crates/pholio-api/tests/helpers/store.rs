//! In-memory metadata store mirroring the Postgres repository's contract.

use async_trait::async_trait;
use pholio_core::models::{PhotoMetadata, PhotoUpdate};
use pholio_core::AppError;
use pholio_db::PhotoStore;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryPhotoStore {
    rows: RwLock<Vec<PhotoMetadata>>,
    fail_reads: AtomicBool,
}

impl InMemoryPhotoStore {
    /// Make subsequent lookups fail, simulating a lost database.
    pub fn poison_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PhotoStore for InMemoryPhotoStore {
    async fn insert(&self, photo: &PhotoMetadata) -> Result<(), AppError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|p| p.id == photo.id) {
            return Err(AppError::Internal(format!(
                "duplicate key value violates unique constraint: {}",
                photo.id
            )));
        }
        rows.push(photo.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PhotoMetadata>, AppError> {
        let mut rows = self.rows.read().await.clone();
        rows.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<PhotoMetadata>, AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Internal("metadata store unavailable".to_string()));
        }
        Ok(self.rows.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn update(
        &self,
        id: &str,
        update: &PhotoUpdate,
    ) -> Result<Option<PhotoMetadata>, AppError> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|p| p.id == id) {
            Some(row) => {
                if let Some(description) = &update.description {
                    row.description = Some(description.clone());
                }
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() < before)
    }
}
