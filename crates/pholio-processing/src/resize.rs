//! Bounded resize for uploaded photos.
//!
//! Images already within the bounding dimension are passed through
//! byte-identical: re-encoding an untouched photo would only cost quality.

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// Errors from decode/re-encode during resize.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Resize so that the larger of width/height equals `max_dimension`,
/// preserving aspect ratio, and re-encode as JPEG. Returns the input bytes
/// unchanged when both dimensions already fall within the bound.
pub fn resize_to_bound(data: &[u8], max_dimension: u32) -> Result<Bytes, TransformError> {
    let img = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| TransformError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| TransformError::Decode(e.to_string()))?;

    let (width, height) = img.dimensions();
    if width <= max_dimension && height <= max_dimension {
        return Ok(Bytes::copy_from_slice(data));
    }

    tracing::debug!(width, height, max_dimension, "Downsampling oversized image");

    let resized = img.resize(max_dimension, max_dimension, FilterType::Triangle);

    // The JPEG encoder rejects alpha channels
    let resized = DynamicImage::ImageRgb8(resized.to_rgb8());

    let (out_width, out_height) = resized.dimensions();
    let mut buffer = Vec::with_capacity(rgb_buffer_estimate(out_width, out_height));
    resized
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .map_err(|e| TransformError::Encode(e.to_string()))?;

    Ok(Bytes::from(buffer))
}

/// Capacity hint for the encode buffer. Computed in usize; a ~26k-square
/// image already exceeds u32 in this product.
fn rgb_buffer_estimate(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}
