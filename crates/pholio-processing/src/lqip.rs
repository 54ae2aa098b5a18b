//! Low-quality image placeholder derivation.
//!
//! The placeholder is the image's average color packed into a reduced
//! bit-depth word (lqip-css scheme): the 11-bit layout splits RGB as
//! 4/4/3 bits, the 10-bit layout as 3/4/3. Both keep the same shift
//! positions, `(r << 7) | (g << 3) | b`. Deterministic for identical
//! pixels, and cheap enough to inline in a stylesheet.

use crate::resize::TransformError;
use image::GenericImageView;
use std::io::Cursor;

/// Pack an 8-bit RGB triple into an 11-bit word (4 bits R, 4 bits G, 3 bits B).
pub fn pack_color_11bit(r: u8, g: u8, b: u8) -> u16 {
    let r = ((r as f32 / 255.0) * 0b1111 as f32).round() as u16;
    let g = ((g as f32 / 255.0) * 0b1111 as f32).round() as u16;
    let b = ((b as f32 / 255.0) * 0b111 as f32).round() as u16;
    (r << 7) | (g << 3) | b
}

/// Pack an 8-bit RGB triple into a 10-bit word (3 bits R, 4 bits G, 3 bits B).
pub fn pack_color_10bit(r: u8, g: u8, b: u8) -> u16 {
    let r = ((r as f32 / 255.0) * 0b111 as f32).round() as u16;
    let g = ((g as f32 / 255.0) * 0b1111 as f32).round() as u16;
    let b = ((b as f32 / 255.0) * 0b111 as f32).round() as u16;
    (r << 7) | (g << 3) | b
}

/// Average RGB over all pixels.
fn average_color(img: &image::DynamicImage) -> (u8, u8, u8) {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let pixel_count = (width as u64) * (height as u64);
    if pixel_count == 0 {
        return (0, 0, 0);
    }

    let mut sums = [0u64; 3];
    for pixel in rgb.pixels() {
        sums[0] += pixel.0[0] as u64;
        sums[1] += pixel.0[1] as u64;
        sums[2] += pixel.0[2] as u64;
    }

    (
        (sums[0] / pixel_count) as u8,
        (sums[1] / pixel_count) as u8,
        (sums[2] / pixel_count) as u8,
    )
}

/// Derive the placeholder string for an image: the 11-bit packed average
/// color rendered as a decimal number. Stored verbatim and treated as
/// opaque by everything downstream.
pub fn derive_lqip(data: &[u8]) -> Result<String, TransformError> {
    let img = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| TransformError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| TransformError::Decode(e.to_string()))?;

    let (width, height) = img.dimensions();
    let (r, g, b) = average_color(&img);
    let packed = pack_color_11bit(r, g, b);

    tracing::debug!(width, height, r, g, b, packed, "Derived placeholder color");

    Ok(packed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    fn solid_png(r: u8, g: u8, b: u8) -> Vec<u8> {
        let img = RgbImage::from_pixel(16, 16, Rgb([r, g, b]));
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_pack_11bit_extremes() {
        assert_eq!(pack_color_11bit(0, 0, 0), 0);
        // White: r=15, g=15, b=7 -> (15<<7)|(15<<3)|7 = 0b111_1111_1111
        assert_eq!(pack_color_11bit(255, 255, 255), 0b111_1111_1111);
    }

    #[test]
    fn test_pack_11bit_channel_layout() {
        // Pure red occupies only the top 4 bits
        assert_eq!(pack_color_11bit(255, 0, 0), 15 << 7);
        assert_eq!(pack_color_11bit(0, 255, 0), 15 << 3);
        assert_eq!(pack_color_11bit(0, 0, 255), 7);
    }

    #[test]
    fn test_pack_10bit_red_loses_a_bit() {
        assert_eq!(pack_color_10bit(255, 0, 0), 7 << 7);
        assert_eq!(pack_color_10bit(0, 255, 0), 15 << 3);
        assert_eq!(pack_color_10bit(0, 0, 255), 7);
    }

    #[test]
    fn test_derive_lqip_deterministic() {
        let data = solid_png(200, 100, 50);
        let a = derive_lqip(&data).unwrap();
        let b = derive_lqip(&data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_lqip_solid_color() {
        let data = solid_png(255, 0, 0);
        let lqip = derive_lqip(&data).unwrap();
        assert_eq!(lqip, (15u16 << 7).to_string());
    }

    #[test]
    fn test_derive_lqip_rejects_garbage() {
        assert!(derive_lqip(b"not an image").is_err());
    }
}
