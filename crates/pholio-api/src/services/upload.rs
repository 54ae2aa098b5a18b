//! Photo upload pipeline
//!
//! One service drives the whole sequence per file:
//! validate → resize → resolve EXIF → resolve LQIP → store blob → insert row.
//!
//! Validation and processing failures are *outcomes*, not errors: they come
//! back as a failed [`UploadedFileResult`] that the handler wraps in an
//! HTTP 200 envelope. Only storage and persistence failures propagate as
//! `AppError`. A row-insert failure after the blob was written surfaces as
//! `PersistenceInconsistency` and the blob is deliberately left in place for
//! reconciliation instead of attempting a compensating delete.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use pholio_core::models::{
    BatchFileResult, BatchFileStatus, ExifData, PhotoMetadata, UploadedFile, UploadedFileResult,
};
use pholio_core::{AppError, ErrorMetadata};
use pholio_processing::{derive_lqip, resize_to_bound, resolve_exif, FileValidator};
use pholio_storage::keys;

use crate::state::AppState;

/// Upload pipeline orchestrator.
pub struct PhotoUploadService {
    state: Arc<AppState>,
}

impl PhotoUploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Process one uploaded file end to end.
    ///
    /// `client_exif` and `client_lqip` are the optional pre-extracted values
    /// from the multipart request; both fall back to server-side derivation.
    #[tracing::instrument(
        skip(self, file, client_exif, client_lqip),
        fields(filename = %file.filename, size = file.data.len(), operation = "upload_photo")
    )]
    pub async fn process_upload(
        &self,
        file: UploadedFile,
        client_exif: Option<ExifData>,
        client_lqip: Option<String>,
    ) -> Result<UploadedFileResult, AppError> {
        let config = &self.state.config;

        let validator = FileValidator::new(
            config.max_file_size_bytes,
            config.allowed_content_types.clone(),
        );
        let validated =
            match validator.validate(&file.filename, &file.content_type, file.data.len()) {
                Ok(validated) => validated,
                Err(err) => {
                    tracing::debug!(error = %err, "Upload rejected by validation");
                    let filename = (!file.filename.is_empty()).then(|| file.filename.clone());
                    return Ok(UploadedFileResult::failure(filename, err.to_string()));
                }
            };

        let resized = match resize_to_bound(&file.data, config.max_image_dimension) {
            Ok(resized) => resized,
            Err(err) => {
                tracing::warn!(error = %err, "Image transform failed");
                return Ok(UploadedFileResult::failure(
                    Some(validated.filename),
                    err.to_string(),
                ));
            }
        };

        // EXIF comes from the original bytes; re-encoding strips the tags
        let exif = match resolve_exif(&file.data, client_exif, config.parse_exif_client_side) {
            Ok(exif) => exif,
            Err(err) => {
                tracing::warn!(error = %err, "EXIF resolution failed");
                return Ok(UploadedFileResult::failure(
                    Some(validated.filename),
                    err.to_string(),
                ));
            }
        };

        // LQIP derivation failure is non-fatal; the field is simply absent
        let lqip = client_lqip.or_else(|| match derive_lqip(&file.data) {
            Ok(lqip) => Some(lqip),
            Err(err) => {
                tracing::debug!(error = %err, "LQIP derivation failed");
                None
            }
        });

        let storage_key = keys::generate_upload_key(&validated.filename);
        let id = keys::id_from_key(&storage_key);
        let stored_size = resized.len() as i64;

        // Metadata must describe the stored bytes: after a downsample the
        // blob is a JPEG re-encode regardless of what was uploaded
        let stored_mime = if resized.as_ref() == file.data.as_slice() {
            validated.content_type.clone()
        } else {
            "image/jpeg".to_string()
        };

        self.state
            .storage
            .put(&storage_key, resized)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %storage_key, "Failed to store blob");
                AppError::Storage(format!("Failed to store photo: {}", e))
            })?;

        let photo = PhotoMetadata {
            id: id.clone(),
            filename: id.clone(),
            original_filename: validated.filename.clone(),
            uploaded_at: Utc::now().timestamp_millis(),
            mime_type: stored_mime.clone(),
            size: stored_size,
            lqip,
            description: None,
            exif,
        };

        if let Err(err) = self.state.photos.insert(&photo).await {
            tracing::error!(
                error = %err,
                key = %storage_key,
                "Row insert failed after blob write; blob left for reconciliation"
            );
            return Err(AppError::PersistenceInconsistency {
                storage_key,
                message: err.to_string(),
            });
        }

        tracing::info!(photo_id = %id, size_bytes = stored_size, "Photo upload successful");

        Ok(UploadedFileResult {
            success: true,
            filename: Some(validated.filename),
            size: Some(stored_size),
            content_type: Some(stored_mime),
            url: Some(format!("/api/images/{}", id)),
            error: None,
        })
    }

    /// Process a batch of files concurrently. Each file is an independent
    /// unit: one failure never affects its siblings, and results keep the
    /// input order.
    pub async fn process_batch(&self, files: Vec<UploadedFile>) -> Vec<BatchFileResult> {
        let filenames: Vec<Option<String>> = files
            .iter()
            .map(|f| (!f.filename.is_empty()).then(|| f.filename.clone()))
            .collect();

        let uploads = files
            .into_iter()
            .map(|file| self.process_upload(file, None, None));

        join_all(uploads)
            .await
            .into_iter()
            .zip(filenames)
            .map(|(outcome, filename)| match outcome {
                Ok(result) if result.success => BatchFileResult {
                    status: BatchFileStatus::Success,
                    filename: result.filename,
                    url: result.url,
                    error: None,
                },
                Ok(result) => BatchFileResult {
                    status: BatchFileStatus::Error,
                    filename: result.filename,
                    url: None,
                    error: result.error,
                },
                Err(err) => BatchFileResult {
                    status: BatchFileStatus::Error,
                    filename,
                    url: None,
                    error: Some(err.client_message()),
                },
            })
            .collect()
    }
}
