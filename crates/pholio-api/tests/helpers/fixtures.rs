//! Test fixtures: decodable image blobs of controlled size and shape.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, Rgb, RgbImage};
use std::io::Cursor;

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// A valid PNG of the given dimensions.
pub fn png_image(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut out = Cursor::new(Vec::new());
    PngEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .expect("PNG encode");
    out.into_inner()
}

/// A valid JPEG of the given dimensions.
pub fn jpeg_image(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, 80)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .expect("JPEG encode");
    out.into_inner()
}

/// A buffer one byte over the given cap. Content never gets decoded because
/// size validation runs first.
pub fn oversize_payload(cap: usize) -> Vec<u8> {
    vec![0u8; cap + 1]
}
