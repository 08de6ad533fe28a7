//! Header-only image metadata inspection.

use crate::{detect_format, ImageFormat};
use serde::{Deserialize, Serialize};

/// Image metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// File size in bytes
    pub size_bytes: usize,
    /// Whether an EXIF block is embedded
    pub has_exif: bool,
}

impl ImageMetadata {
    /// Calculate aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Check if image is landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    /// Check if image is portrait orientation.
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Human orientation label.
    pub fn orientation(&self) -> &'static str {
        if self.is_landscape() {
            "Landscape"
        } else if self.is_portrait() {
            "Portrait"
        } else {
            "Square"
        }
    }
}

/// Extract metadata from image data.
///
/// JPEG, PNG and GIF dimensions come from the header without decoding.
/// Other formats go through the `image` crate's header reader when the
/// `processing` feature is enabled.
pub fn extract_metadata(data: &[u8]) -> Option<ImageMetadata> {
    let format = detect_format(data).ok()?;

    let (width, height) = match format {
        ImageFormat::Jpeg => extract_jpeg_dimensions(data)?,
        ImageFormat::Png => extract_png_dimensions(data)?,
        ImageFormat::Gif => extract_gif_dimensions(data)?,
        #[cfg(feature = "processing")]
        f if f.is_decodable() => crate::sanitize::dimensions(data).ok()?,
        _ => return None,
    };

    Some(ImageMetadata {
        width,
        height,
        format,
        size_bytes: data.len(),
        has_exif: has_exif(data),
    })
}

/// Whether the data carries an EXIF block.
///
/// Looks for a JPEG APP1 segment starting with `Exif\0\0`, or a PNG `eXIf`
/// chunk. Other containers report `false`.
pub fn has_exif(data: &[u8]) -> bool {
    match detect_format(data) {
        Ok(ImageFormat::Jpeg) => jpeg_has_exif(data),
        Ok(ImageFormat::Png) => png_has_exif(data),
        _ => false,
    }
}

/// Walk JPEG marker segments until start-of-scan.
fn jpeg_segments(data: &[u8]) -> impl Iterator<Item = (u8, &[u8])> {
    let mut i = 2;
    std::iter::from_fn(move || {
        while i + 4 <= data.len() {
            if data[i] != 0xFF {
                i += 1;
                continue;
            }

            let marker = data[i + 1];

            // Fill bytes, SOI, EOI and RST markers have no length
            if marker == 0xFF {
                i += 1;
                continue;
            }
            if marker == 0xD8 || marker == 0xD9 || (0xD0..=0xD7).contains(&marker) {
                i += 2;
                continue;
            }
            // Entropy-coded data follows SOS
            if marker == 0xDA {
                return None;
            }

            let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            if length < 2 {
                return None;
            }
            let start = i + 4;
            let end = (i + 2 + length).min(data.len());
            i += 2 + length;
            return Some((marker, &data[start..end]));
        }
        None
    })
}

fn jpeg_has_exif(data: &[u8]) -> bool {
    jpeg_segments(data).any(|(marker, payload)| marker == 0xE1 && payload.starts_with(b"Exif\0\0"))
}

/// Extract dimensions from JPEG data.
fn extract_jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    // SOF markers contain dimensions
    jpeg_segments(data)
        .find(|(marker, payload)| {
            matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
                && payload.len() >= 5
        })
        .map(|(_, payload)| {
            let height = u16::from_be_bytes([payload[1], payload[2]]) as u32;
            let width = u16::from_be_bytes([payload[3], payload[4]]) as u32;
            (width, height)
        })
}

fn png_has_exif(data: &[u8]) -> bool {
    // 8 byte signature, then length(4) type(4) data(length) crc(4)
    let mut i = 8;
    while i + 8 <= data.len() {
        let length = u32::from_be_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]) as usize;
        let chunk_type = &data[i + 4..i + 8];
        if chunk_type == b"eXIf" {
            return true;
        }
        // eXIf may follow IDAT, so only IEND stops the scan
        if chunk_type == b"IEND" {
            return false;
        }
        i = match i.checked_add(12 + length) {
            Some(next) => next,
            None => return false,
        };
    }
    false
}

/// Extract dimensions from PNG data.
fn extract_png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    // PNG header is 8 bytes, IHDR chunk starts at byte 8
    if data.len() < 24 {
        return None;
    }

    // IHDR chunk: 4 bytes length + 4 bytes "IHDR" + 4 bytes width + 4 bytes height
    let chunk_type = &data[12..16];
    if chunk_type != b"IHDR" {
        return None;
    }

    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);

    Some((width, height))
}

/// Extract dimensions from GIF data.
fn extract_gif_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    // GIF header: 6 bytes signature + 2 bytes width + 2 bytes height
    if data.len() < 10 {
        return None;
    }

    let width = u16::from_le_bytes([data[6], data[7]]) as u32;
    let height = u16::from_le_bytes([data[8], data[9]]) as u32;

    Some((width, height))
}
