//! Shared constants for upload limits and defaults.

/// Maximum accepted upload size in bytes (10 MiB).
pub const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Content types accepted by the upload endpoint.
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Largest bounding dimension kept after resize, in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 3840;

/// Prefix under which photo blobs are stored.
pub const UPLOADS_PREFIX: &str = "uploads";

/// Cache directive for served photo blobs (one year).
pub const PHOTO_CACHE_CONTROL: &str = "public, max-age=31536000";
