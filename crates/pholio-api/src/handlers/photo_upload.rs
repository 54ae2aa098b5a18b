//! Photo upload handlers: single file and batch.
//!
//! Both read `multipart/form-data`. The single endpoint honors three part
//! names: `image` (the file), `exifData` (JSON-encoded pre-extracted
//! metadata), and `lqip` (placeholder string). The batch endpoint reads every
//! `image` part and ignores the rest.
//!
//! Pipeline failures (validation, transform, EXIF) are reported inside an
//! HTTP 200 envelope with `success: false`; only transport-level problems
//! (malformed multipart, storage failures) surface as error status codes.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use pholio_core::models::{
    BatchFileStatus, BatchUploadResponse, ExifData, UploadResponse, UploadedFile,
};
use pholio_core::AppError;

use crate::error::HttpAppError;
use crate::services::PhotoUploadService;
use crate::state::AppState;

/// Everything we pull out of a single-upload multipart body.
struct UploadParts {
    image: Option<UploadedFile>,
    exif: Option<ExifData>,
    lqip: Option<String>,
}

async fn read_parts(mut multipart: Multipart) -> Result<UploadParts, AppError> {
    let mut parts = UploadParts {
        image: None,
        exif: None,
        lqip: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart request: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Failed to read file: {}", e)))?;
                // First image part wins on the single endpoint
                if parts.image.is_none() {
                    parts.image = Some(UploadedFile {
                        name: name.clone(),
                        filename,
                        content_type,
                        data: data.to_vec(),
                    });
                }
            }
            Some("exifData") => {
                let text = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read EXIF field: {}", e))
                })?;
                let exif: ExifData = serde_json::from_str(&text)
                    .map_err(|_| AppError::InvalidInput("Invalid EXIF data format".to_string()))?;
                parts.exif = Some(exif);
            }
            Some("lqip") => {
                let text = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read LQIP field: {}", e))
                })?;
                if !text.is_empty() {
                    parts.lqip = Some(text);
                }
            }
            _ => {}
        }
    }

    Ok(parts)
}

/// Upload a single photo.
///
/// Returns HTTP 200 with `{success, file, message}`; the flag carries the
/// outcome so a rejected gif and a stored jpeg travel the same shape.
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let parts = read_parts(multipart).await.map_err(HttpAppError::from)?;

    let image = parts.image.ok_or_else(|| {
        HttpAppError(AppError::InvalidInput(
            "No image file found in upload.".to_string(),
        ))
    })?;

    let service = PhotoUploadService::new(&state);
    let result = service
        .process_upload(image, parts.exif, parts.lqip)
        .await
        .map_err(HttpAppError::from)?;

    let message = if result.success {
        "Image uploaded successfully."
    } else {
        "Image upload failed."
    };

    Ok(Json(UploadResponse {
        success: result.success,
        file: result,
        message: message.to_string(),
    }))
}

/// Upload several photos in one request.
///
/// Every `image` part is processed as an independent unit; the response
/// carries one slot per part, in input order.
pub async fn upload_photos_batch(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<BatchUploadResponse>, HttpAppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        HttpAppError(AppError::InvalidInput(format!(
            "Malformed multipart request: {}",
            e
        )))
    })? {
        if field.name() != Some("image") {
            continue;
        }
        let name = field.name().map(str::to_string);
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            HttpAppError(AppError::InvalidInput(format!("Failed to read file: {}", e)))
        })?;
        files.push(UploadedFile {
            name,
            filename,
            content_type,
            data: data.to_vec(),
        });
    }

    if files.is_empty() {
        return Err(HttpAppError(AppError::InvalidInput(
            "No image files were found in the upload.".to_string(),
        )));
    }

    let service = PhotoUploadService::new(&state);
    let results = service.process_batch(files).await;

    let failed = results
        .iter()
        .filter(|r| r.status == BatchFileStatus::Error)
        .count();
    tracing::info!(
        total = results.len(),
        failed,
        "Batch upload processed"
    );

    Ok(Json(BatchUploadResponse {
        success: true,
        files: results,
        message: "Image upload processed successfully.".to_string(),
    }))
}
