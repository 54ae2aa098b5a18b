//! Pholio Storage Library
//!
//! This crate provides the blob storage abstraction and its local filesystem
//! implementation.
//!
//! # Storage key format
//!
//! Every stored photo lives under a single namespace:
//!
//! - **Key**: `uploads/{millis}-{filename}`
//!
//! where `{millis}` is the epoch-millisecond timestamp at upload time and
//! `{filename}` is the sanitized client filename. The photo id exposed by the
//! API is the key with its `uploads/` prefix stripped, so keys and ids convert
//! back and forth losslessly. Keys must not contain `..` or a leading `/`.

pub mod keys;
pub mod local;
pub mod traits;

pub use keys::{generate_upload_key, id_from_key, key_from_id, sanitize_filename};
pub use local::LocalStorage;
pub use traits::{BlobStore, StorageError, StorageResult};
