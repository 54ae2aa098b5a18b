//! Upload file validation.
//!
//! Pure pre-checks over the file descriptor (filename, content type, byte
//! length) so a request can be rejected before any decoding work. Rules run
//! in a fixed order and the first failure wins.

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

fn mb(bytes: &usize) -> String {
    format!("{:.2}", *bytes as f64 / BYTES_PER_MB)
}

/// Validation errors for uploaded files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing filename")]
    MissingFilename,

    #[error("Invalid file type: {content_type}. Allowed: {}", .allowed.join(", "))]
    UnsupportedType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Empty file")]
    EmptyFile,

    #[error("File too large: {}MB. Maximum: {}MB", mb(.size), mb(.max))]
    FileTooLarge { size: usize, max: usize },
}

/// Descriptor echoed back on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFile {
    pub filename: String,
    pub size: usize,
    pub content_type: String,
}

/// Upload file validator
///
/// Holds the upload policy (size cap, content-type allow-list) without
/// coupling to storage or transport details.
pub struct FileValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl FileValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types,
        }
    }

    /// Validate a file descriptor. Checks run in order; the first failing
    /// rule determines the error.
    pub fn validate(
        &self,
        filename: &str,
        content_type: &str,
        size: usize,
    ) -> Result<ValidatedFile, ValidationError> {
        if filename.is_empty() {
            return Err(ValidationError::MissingFilename);
        }

        let normalized = content_type.to_lowercase();
        if !self.allowed_content_types.iter().any(|ct| ct == &normalized) {
            return Err(ValidationError::UnsupportedType {
                content_type: if content_type.is_empty() {
                    "unknown".to_string()
                } else {
                    content_type.to_string()
                },
                allowed: self.allowed_content_types.clone(),
            });
        }

        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(ValidatedFile {
            filename: filename.to_string(),
            size,
            content_type: content_type.to_string(),
        })
    }
}
