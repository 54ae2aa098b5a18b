//! Pholio Processing Library
//!
//! Pure image-pipeline stages: upload validation, bounded resize, LQIP
//! derivation, and EXIF extraction. No I/O happens here; persistence is the
//! caller's concern.

pub mod exif;
pub mod lqip;
pub mod resize;
pub mod validator;

pub use crate::exif::{extract_exif, resolve_exif, ExifError};
pub use lqip::{derive_lqip, pack_color_10bit, pack_color_11bit};
pub use resize::{resize_to_bound, TransformError};
pub use validator::{FileValidator, ValidatedFile, ValidationError};
