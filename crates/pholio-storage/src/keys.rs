//! Shared key generation for storage backends.
//!
//! Key format: `uploads/{millis}-{filename}`. The photo id is the key with
//! the `uploads/` prefix stripped, so `id_from_key` and `key_from_id` are
//! inverses.

use pholio_core::constants::UPLOADS_PREFIX;

/// Generate a fresh storage key for an uploaded file.
///
/// The epoch-millisecond prefix makes concurrent uploads of the same filename
/// land under distinct keys without coordination.
pub fn generate_upload_key(filename: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{}/{}-{}", UPLOADS_PREFIX, millis, sanitize_filename(filename))
}

/// Derive the public photo id from a storage key.
pub fn id_from_key(storage_key: &str) -> String {
    storage_key
        .strip_prefix(&format!("{}/", UPLOADS_PREFIX))
        .unwrap_or(storage_key)
        .to_string()
}

/// Reconstruct the storage key for a photo id.
pub fn key_from_id(id: &str) -> String {
    format!("{}/{}", UPLOADS_PREFIX, id)
}

/// Reduce a client-supplied filename to characters safe for a storage key.
///
/// Anything outside `[A-Za-z0-9._-]` becomes `_`, and `..` sequences are
/// collapsed, so path separators and traversal sequences never survive into
/// keys.
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.replace("..", "_");

    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}
