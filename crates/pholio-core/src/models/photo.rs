//! Photo domain models and API response envelopes.
//!
//! Wire names are camelCase and optional fields are omitted when absent, so
//! a SQL NULL never surfaces as a JSON null to clients.

use serde::{Deserialize, Serialize};

/// A file decoded from one multipart part. Request-scoped; dropped after the
/// upload pipeline finishes with it.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Multipart field name ("image"), if any.
    pub name: Option<String>,
    /// Client-supplied filename, preserved for display.
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Camera metadata extracted from EXIF tags, or supplied pre-extracted by
/// the client. Every field is optional; extraction never fails just because
/// tags are missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExifData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<String>,
    /// Capture time as epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
}

impl ExifData {
    pub fn is_empty(&self) -> bool {
        *self == ExifData::default()
    }
}

/// The persisted photo metadata row.
///
/// `id` is the tail segment of the storage key assigned when the blob was
/// written; `size` and `mime_type` describe the stored (post-resize) bytes,
/// not the original upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMetadata {
    pub id: String,
    pub filename: String,
    pub original_filename: String,
    /// Epoch milliseconds, set server-side at insert time.
    pub uploaded_at: i64,
    pub mime_type: String,
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lqip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub exif: ExifData,
}

/// A photo row augmented with its derived URL. The URL is computed from the
/// id on every read and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    #[serde(flatten)]
    pub photo: PhotoMetadata,
    pub url: String,
}

impl PhotoResponse {
    pub fn from_metadata(photo: PhotoMetadata) -> Self {
        let url = format!("/api/images/{}", photo.id);
        Self { photo, url }
    }
}

/// Partial update applied by PATCH. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUpdate {
    pub description: Option<String>,
}

impl PhotoUpdate {
    pub fn is_noop(&self) -> bool {
        self.description.is_none()
    }
}

/// Per-file outcome inside an upload response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFileResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadedFileResult {
    pub fn failure(filename: Option<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            filename,
            size: None,
            content_type: None,
            url: None,
            error: Some(error.into()),
        }
    }
}

/// Envelope for a single-file upload. Always delivered with HTTP 200; the
/// `success` flag carries the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub file: UploadedFileResult,
    pub message: String,
}

/// Per-file slot in a batch upload response, addressed by input index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFileResult {
    pub status: BatchFileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchFileStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchUploadResponse {
    pub success: bool,
    pub files: Vec<BatchFileResult>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoListData {
    pub count: usize,
    pub photos: Vec<PhotoResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoListResponse {
    pub success: bool,
    pub data: PhotoListData,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_photo() -> PhotoMetadata {
        PhotoMetadata {
            id: "1697040000000-cat.jpg".to_string(),
            filename: "1697040000000-cat.jpg".to_string(),
            original_filename: "cat.jpg".to_string(),
            uploaded_at: 1_697_040_000_123,
            mime_type: "image/jpeg".to_string(),
            size: 2048,
            lqip: None,
            description: None,
            exif: ExifData::default(),
        }
    }

    #[test]
    fn test_absent_fields_are_omitted_not_null() {
        let json = serde_json::to_value(sample_photo()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("description"));
        assert!(!obj.contains_key("lqip"));
        assert!(!obj.contains_key("cameraMake"));
        assert!(!obj.contains_key("takenAt"));
        assert_eq!(obj["mimeType"], "image/jpeg");
        assert_eq!(obj["originalFilename"], "cat.jpg");
    }

    #[test]
    fn test_response_url_derived_from_id() {
        let response = PhotoResponse::from_metadata(sample_photo());
        assert_eq!(response.url, "/api/images/1697040000000-cat.jpg");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["url"], "/api/images/1697040000000-cat.jpg");
        // Flattened: id sits next to url, not nested
        assert_eq!(json["id"], "1697040000000-cat.jpg");
    }

    #[test]
    fn test_exif_camel_case_round_trip() {
        let exif = ExifData {
            camera_make: Some("Canon".to_string()),
            iso: Some("400".to_string()),
            taken_at: Some(1_686_818_600_000),
            ..Default::default()
        };
        let json = serde_json::to_value(&exif).unwrap();
        assert_eq!(json["cameraMake"], "Canon");
        assert_eq!(json["takenAt"], 1_686_818_600_000_i64);
        let back: ExifData = serde_json::from_value(json).unwrap();
        assert_eq!(back, exif);
    }

    #[test]
    fn test_exif_rejects_wrong_field_types() {
        // takenAt must be numeric millis, not a date string
        let raw = serde_json::json!({ "takenAt": "2023-06-15" });
        assert!(serde_json::from_value::<ExifData>(raw).is_err());
    }

    #[test]
    fn test_batch_status_serializes_lowercase() {
        let slot = BatchFileResult {
            status: BatchFileStatus::Success,
            filename: Some("a.jpg".to_string()),
            url: Some("/api/images/1-a.jpg".to_string()),
            error: None,
        };
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["status"], "success");
        assert!(json.as_object().unwrap().get("error").is_none());
    }
}
