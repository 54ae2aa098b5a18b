//! EXIF metadata extraction.
//!
//! Runs on the original (pre-resize) bytes, since re-encoding strips
//! embedded metadata. Tags are normalized into the flat [`ExifData`] shape:
//! display strings for camera settings, epoch milliseconds for the capture
//! time, decimal degrees for GPS. Missing tags simply yield absent fields;
//! extraction only fails when the bytes are not a parseable image container.
//! Maker notes are never read.

use ::exif::{Exif, In, Rational, Reader, Tag, Value};
use chrono::{Local, LocalResult, NaiveDateTime, TimeZone};
use pholio_core::models::ExifData;
use std::io::Cursor;

#[derive(Debug, thiserror::Error)]
pub enum ExifError {
    #[error("Failed to extract EXIF data from image: {0}")]
    Parse(String),
}

/// Extract camera metadata from raw image bytes.
pub fn extract_exif(data: &[u8]) -> Result<ExifData, ExifError> {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(data)) {
        Ok(exif) => exif,
        Err(err) => {
            // A well-formed image with no EXIF body is not an error; only an
            // unrecognizable byte stream is.
            if image::guess_format(data).is_ok() {
                return Ok(ExifData::default());
            }
            return Err(ExifError::Parse(err.to_string()));
        }
    };

    let taken_at = ascii_field(&exif, Tag::DateTimeOriginal).and_then(|s| parse_exif_datetime(&s));

    Ok(ExifData {
        camera_make: ascii_field(&exif, Tag::Make),
        camera_model: ascii_field(&exif, Tag::Model),
        exposure_time: display_field(&exif, Tag::ExposureTime),
        aperture: display_field(&exif, Tag::ApertureValue),
        iso: iso_field(&exif),
        focal_length: display_field(&exif, Tag::FocalLength)
            .and_then(|s| normalize_focal_length(&s)),
        taken_at,
        latitude: gps_coordinate(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, "S"),
        longitude: gps_coordinate(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, "W"),
    })
}

/// Resolve EXIF metadata for an upload: trust the client-supplied structure
/// when client-side extraction is configured and data was actually sent,
/// otherwise extract from the bytes. Both paths produce the same shape.
pub fn resolve_exif(
    data: &[u8],
    client_exif: Option<ExifData>,
    parse_client_side: bool,
) -> Result<ExifData, ExifError> {
    if parse_client_side {
        if let Some(exif) = client_exif {
            if !exif.is_empty() {
                return Ok(exif);
            }
        }
        tracing::debug!("Client-side extraction configured but no data supplied; extracting");
    }
    extract_exif(data)
}

fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(lines) => lines.first().map(|line| {
            String::from_utf8_lossy(line)
                .trim_matches(char::from(0))
                .trim()
                .to_string()
        }),
        _ => None,
    }
    .filter(|s| !s.is_empty())
}

fn display_field(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let rendered = field.display_value().to_string();
    if rendered.is_empty() {
        None
    } else {
        Some(rendered)
    }
}

/// ISO prefers the rendered description and falls back to the raw numeric
/// value stringified.
fn iso_field(exif: &Exif) -> Option<String> {
    let field = exif.get_field(Tag::PhotographicSensitivity, In::PRIMARY)?;
    let rendered = field.display_value().to_string();
    if !rendered.is_empty() {
        return Some(rendered);
    }
    field.value.get_uint(0).map(|v| v.to_string())
}

/// Strip a focal-length description like "50 mm" down to a bare numeral
/// with one decimal place ("50.0").
pub(crate) fn normalize_focal_length(description: &str) -> Option<String> {
    let numeric: String = description
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let parsed: f64 = numeric.parse().ok()?;
    Some(format!("{:.1}", parsed))
}

/// Parse an EXIF datetime description of the form `YYYY:MM:DD HH:mm:ss` by
/// rewriting the first two colons to hyphens and interpreting the result as
/// a local datetime. Returns epoch milliseconds, or None when the
/// description does not parse.
pub(crate) fn parse_exif_datetime(description: &str) -> Option<i64> {
    let rewritten = description.replacen(':', "-", 2);
    let naive = NaiveDateTime::parse_from_str(&rewritten, "%Y-%m-%d %H:%M:%S").ok()?;
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.timestamp_millis()),
        // DST fold: take the earlier reading
        LocalResult::Ambiguous(dt, _) => Some(dt.timestamp_millis()),
        LocalResult::None => None,
    }
}

/// Fold degrees/minutes/seconds rationals into signed decimal degrees.
pub(crate) fn dms_to_decimal(dms: &[Rational]) -> Option<f64> {
    let degrees = dms.first()?.to_f64();
    let minutes = dms.get(1).map(|r| r.to_f64()).unwrap_or(0.0);
    let seconds = dms.get(2).map(|r| r.to_f64()).unwrap_or(0.0);
    Some(degrees + minutes / 60.0 + seconds / 3600.0)
}

fn gps_coordinate(
    exif: &Exif,
    value_tag: Tag,
    ref_tag: Tag,
    negative_ref: &str,
) -> Option<String> {
    let field = exif.get_field(value_tag, In::PRIMARY)?;
    let decimal = match &field.value {
        Value::Rational(parts) => dms_to_decimal(parts)?,
        _ => return None,
    };

    let hemisphere = exif
        .get_field(ref_tag, In::PRIMARY)
        .and_then(|f| match &f.value {
            Value::Ascii(lines) => lines
                .first()
                .map(|line| String::from_utf8_lossy(line).trim().to_uppercase()),
            _ => None,
        });

    let signed = if hemisphere.as_deref() == Some(negative_ref) {
        -decimal
    } else {
        decimal
    };

    Some(format!("{}", signed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    fn plain_png() -> Vec<u8> {
        let img = RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]));
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    /// Minimal little-endian TIFF carrying Make, ISO, DateTimeOriginal and
    /// a south/west GPS fix. Offsets into the data area are laid out by
    /// hand; the `debug_assert` pins the layout.
    fn tagged_tiff() -> Vec<u8> {
        const ASCII: u16 = 2;
        const SHORT: u16 = 3;
        const LONG: u16 = 4;
        const RATIONAL: u16 = 5;

        fn entry(buf: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: [u8; 4]) {
            buf.extend_from_slice(&tag.to_le_bytes());
            buf.extend_from_slice(&kind.to_le_bytes());
            buf.extend_from_slice(&count.to_le_bytes());
            buf.extend_from_slice(&value);
        }

        fn rational(buf: &mut Vec<u8>, num: u32, denom: u32) {
            buf.extend_from_slice(&num.to_le_bytes());
            buf.extend_from_slice(&denom.to_le_bytes());
        }

        let mut buf = Vec::new();
        // Header: byte order, magic, offset of IFD0
        buf.extend_from_slice(b"II");
        buf.extend_from_slice(&42u16.to_le_bytes());
        buf.extend_from_slice(&8u32.to_le_bytes());

        // IFD0 at 8: Make plus pointers to the Exif and GPS IFDs
        buf.extend_from_slice(&3u16.to_le_bytes());
        entry(&mut buf, 0x010F, ASCII, 6, 134u32.to_le_bytes());
        entry(&mut buf, 0x8769, LONG, 1, 50u32.to_le_bytes());
        entry(&mut buf, 0x8825, LONG, 1, 80u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());

        // Exif IFD at 50: ISO inline, DateTimeOriginal in the data area
        buf.extend_from_slice(&2u16.to_le_bytes());
        entry(&mut buf, 0x8827, SHORT, 1, [0x90, 0x01, 0, 0]);
        entry(&mut buf, 0x9003, ASCII, 20, 140u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());

        // GPS IFD at 80: hemisphere refs inline, DMS rationals in the
        // data area
        buf.extend_from_slice(&4u16.to_le_bytes());
        entry(&mut buf, 0x0001, ASCII, 2, [b'S', 0, 0, 0]);
        entry(&mut buf, 0x0002, RATIONAL, 3, 160u32.to_le_bytes());
        entry(&mut buf, 0x0003, ASCII, 2, [b'W', 0, 0, 0]);
        entry(&mut buf, 0x0004, RATIONAL, 3, 184u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());

        debug_assert_eq!(buf.len(), 134);
        buf.extend_from_slice(b"Canon\0");
        buf.extend_from_slice(b"2023:06:15 10:30:00\0");
        // 48 deg 51' 29.79" S
        rational(&mut buf, 48, 1);
        rational(&mut buf, 51, 1);
        rational(&mut buf, 2979, 100);
        // 2 deg 17' 40.2" W
        rational(&mut buf, 2, 1);
        rational(&mut buf, 17, 1);
        rational(&mut buf, 402, 10);
        buf
    }

    #[test]
    fn test_image_without_exif_yields_empty_metadata() {
        let data = plain_png();
        let exif = extract_exif(&data).unwrap();
        assert!(exif.is_empty());
    }

    #[test]
    fn test_extract_exif_reads_embedded_tags() {
        let exif = extract_exif(&tagged_tiff()).unwrap();

        assert_eq!(exif.camera_make.as_deref(), Some("Canon"));
        assert_eq!(exif.iso.as_deref(), Some("400"));

        let expected = Local
            .from_local_datetime(
                &NaiveDateTime::parse_from_str("2023-06-15 10:30:00", "%Y-%m-%d %H:%M:%S")
                    .unwrap(),
            )
            .single()
            .unwrap()
            .timestamp_millis();
        assert_eq!(exif.taken_at, Some(expected));
    }

    #[test]
    fn test_extract_exif_signs_gps_by_hemisphere() {
        let exif = extract_exif(&tagged_tiff()).unwrap();

        let latitude: f64 = exif.latitude.unwrap().parse().unwrap();
        let longitude: f64 = exif.longitude.unwrap().parse().unwrap();
        assert!((latitude - -48.858275).abs() < 1e-6, "got {latitude}");
        assert!((longitude - -2.2945).abs() < 1e-6, "got {longitude}");
    }

    #[test]
    fn test_unparseable_bytes_fail() {
        let err = extract_exif(b"not an image at all");
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_exif_datetime_matches_local_epoch_millis() {
        let expected = Local
            .from_local_datetime(
                &NaiveDateTime::parse_from_str("2023-06-15 10:30:00", "%Y-%m-%d %H:%M:%S")
                    .unwrap(),
            )
            .single()
            .unwrap()
            .timestamp_millis();
        assert_eq!(parse_exif_datetime("2023:06:15 10:30:00"), Some(expected));
    }

    #[test]
    fn test_parse_exif_datetime_rejects_garbage() {
        assert_eq!(parse_exif_datetime("not a date"), None);
        assert_eq!(parse_exif_datetime("2023:13:45 99:99:99"), None);
    }

    #[test]
    fn test_normalize_focal_length_strips_units() {
        assert_eq!(normalize_focal_length("50 mm"), Some("50.0".to_string()));
        assert_eq!(normalize_focal_length("4.25 mm"), Some("4.3".to_string()));
        assert_eq!(normalize_focal_length("105"), Some("105.0".to_string()));
        assert_eq!(normalize_focal_length("unknown"), None);
    }

    #[test]
    fn test_dms_to_decimal() {
        let dms = [
            Rational { num: 48, denom: 1 },
            Rational { num: 51, denom: 1 },
            Rational { num: 2979, denom: 100 },
        ];
        let decimal = dms_to_decimal(&dms).unwrap();
        assert!((decimal - 48.858275).abs() < 1e-6, "got {decimal}");
    }

    #[test]
    fn test_resolve_prefers_client_data_when_configured() {
        let client = ExifData {
            camera_make: Some("Canon".to_string()),
            iso: Some("400".to_string()),
            ..Default::default()
        };
        let resolved = resolve_exif(&plain_png(), Some(client.clone()), true).unwrap();
        assert_eq!(resolved, client);
    }

    #[test]
    fn test_resolve_ignores_client_data_when_server_side() {
        let client = ExifData {
            camera_make: Some("Canon".to_string()),
            ..Default::default()
        };
        // Server-side mode re-extracts; the plain PNG has no tags
        let resolved = resolve_exif(&plain_png(), Some(client), false).unwrap();
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_resolve_falls_back_when_client_data_missing() {
        let resolved = resolve_exif(&plain_png(), None, true).unwrap();
        assert!(resolved.is_empty());

        // An empty client structure also falls back to extraction
        let resolved = resolve_exif(&plain_png(), Some(ExifData::default()), true).unwrap();
        assert!(resolved.is_empty());
    }
}
