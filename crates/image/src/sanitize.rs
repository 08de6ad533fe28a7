//! Metadata stripping by re-encoding.
//!
//! The bitmap is decoded and written out again unscaled. Nothing from the
//! original container survives: EXIF (including GPS and orientation), ICC
//! profiles and text chunks are all dropped. Images whose orientation lived
//! only in EXIF will therefore display in their stored orientation.

use crate::alpha::{flatten_alpha, CANVAS_JPEG_BACKGROUND};
use crate::{detect_format, sanitized_file_name, ImageError, ImageFormat, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageEncoder, ImageOutputFormat};
use photobeam_core::LocalFile;
use std::borrow::Cow;
use std::io::Cursor;
use tracing::debug;

/// JPEG quality used for re-encoding (0.92 on a canvas).
pub const SANITIZE_QUALITY: u8 = 92;

/// Options for re-encoding.
#[derive(Debug, Clone)]
pub struct SanitizeOptions {
    /// JPEG quality (1-100)
    pub quality: u8,
    /// Refuse to decode images with more pixels than this
    pub max_pixels: Option<u64>,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            quality: SANITIZE_QUALITY,
            max_pixels: Some(100_000_000),
        }
    }
}

fn codec_format(format: ImageFormat) -> Option<image::ImageFormat> {
    match format {
        ImageFormat::Jpeg => Some(image::ImageFormat::Jpeg),
        ImageFormat::Png => Some(image::ImageFormat::Png),
        ImageFormat::Gif => Some(image::ImageFormat::Gif),
        ImageFormat::WebP => Some(image::ImageFormat::WebP),
        ImageFormat::Bmp => Some(image::ImageFormat::Bmp),
        ImageFormat::Tiff => Some(image::ImageFormat::Tiff),
        ImageFormat::Avif | ImageFormat::Heic => None,
    }
}

/// Format a re-encoded image is written in.
///
/// JPEG stays JPEG; every other decodable format is written as lossless PNG,
/// which is what a canvas falls back to for types it cannot export.
pub fn output_format_for(input: ImageFormat) -> ImageFormat {
    match input {
        ImageFormat::Jpeg => ImageFormat::Jpeg,
        _ => ImageFormat::Png,
    }
}

/// Read pixel dimensions from the header.
pub fn dimensions(data: &[u8]) -> Result<(u32, u32)> {
    let format = detect_format(data)?;
    let codec = codec_format(format).ok_or(ImageError::UnsupportedFormat(format.name()))?;

    let mut reader = image::io::Reader::new(Cursor::new(data));
    reader.set_format(codec);
    reader.into_dimensions().map_err(ImageError::Decode)
}

/// Decode an image into a bitmap.
pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    let format = detect_format(data)?;
    let codec = codec_format(format).ok_or(ImageError::UnsupportedFormat(format.name()))?;
    image::load_from_memory_with_format(data, codec).map_err(ImageError::Decode)
}

fn encode(img: &DynamicImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());

    let written = match format {
        ImageFormat::Jpeg => {
            let flat = flatten_alpha(img, CANVAS_JPEG_BACKGROUND);
            flat.write_to(&mut buffer, ImageOutputFormat::Jpeg(quality.clamp(1, 100)))
        }
        ImageFormat::Png => return encode_png(img),
        other => {
            return Err(ImageError::InvalidData(format!(
                "Unsupported output format: {}",
                other.name()
            )));
        }
    };
    written.map_err(ImageError::Encode)?;

    Ok(buffer.into_inner())
}

/// Lossless PNG at maximum compression.
///
/// The `image` crate's default PNG writer uses a lower level, so a clean PNG
/// written by it still comes back with a different zlib stream. Running this
/// on its own output is idempotent.
fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    // PNG has no float samples
    let img: Cow<'_, DynamicImage> = match img {
        DynamicImage::ImageRgb32F(_) => Cow::Owned(DynamicImage::ImageRgb16(img.to_rgb16())),
        DynamicImage::ImageRgba32F(_) => Cow::Owned(DynamicImage::ImageRgba16(img.to_rgba16())),
        _ => Cow::Borrowed(img),
    };

    let mut bytes = Vec::new();
    PngEncoder::new_with_quality(&mut bytes, CompressionType::Best, FilterType::Adaptive)
        .write_image(img.as_bytes(), img.width(), img.height(), img.color())
        .map_err(ImageError::Encode)?;
    Ok(bytes)
}

/// Refuse images above `limit` pixels, reading only the header.
fn check_pixel_limit(data: &[u8], limit: Option<u64>) -> Result<()> {
    let Some(limit) = limit else {
        return Ok(());
    };
    let (width, height) = dimensions(data)?;
    if u64::from(width) * u64::from(height) > limit {
        return Err(ImageError::InvalidData(format!(
            "{}x{} exceeds the {} pixel limit",
            width, height, limit
        )));
    }
    Ok(())
}

/// Re-encode raw image bytes without metadata.
///
/// Returns the new bytes and the format they are written in.
pub fn sanitize_bytes(data: &[u8], options: &SanitizeOptions) -> Result<(Vec<u8>, ImageFormat)> {
    let input = detect_format(data)?;

    check_pixel_limit(data, options.max_pixels)?;

    let img = decode(data)?;
    let output = output_format_for(input);
    let encoded = encode(&img, output, options.quality)?;

    debug!(
        input = input.name(),
        output = output.name(),
        width = img.width(),
        height = img.height(),
        before = data.len(),
        after = encoded.len(),
        "Re-encoded image without metadata"
    );

    Ok((encoded, output))
}

/// Strip metadata from a selected file with default options.
pub fn sanitize_file(file: &LocalFile) -> Result<LocalFile> {
    sanitize_file_with(file, &SanitizeOptions::default())
}

/// Strip metadata from a selected file.
///
/// The result is a new file: fresh timestamp, the output format's media type,
/// and a name whose extension matches that format.
pub fn sanitize_file_with(file: &LocalFile, options: &SanitizeOptions) -> Result<LocalFile> {
    let (bytes, format) = sanitize_bytes(&file.bytes, options)?;
    Ok(LocalFile::new(
        sanitized_file_name(&file.name, format),
        format.mime_type(),
        bytes,
    ))
}

/// Encode a PNG preview whose longer edge is at most `max_edge` pixels.
///
/// Images above `max_pixels` are refused before decoding.
pub fn thumbnail(data: &[u8], max_edge: u32, max_pixels: Option<u64>) -> Result<Vec<u8>> {
    check_pixel_limit(data, max_pixels)?;
    let img = decode(data)?;
    let thumb = if img.width() > max_edge || img.height() > max_edge {
        img.thumbnail(max_edge, max_edge)
    } else {
        img
    };
    encode(&thumb, ImageFormat::Png, SANITIZE_QUALITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::has_exif;
    use image::{ImageBuffer, Rgb, Rgba};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 128])
        }))
    }

    fn encode_as(img: &DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    /// JPEG with a GPS-bearing EXIF segment spliced in after SOI.
    fn jpeg_with_exif(width: u32, height: u32) -> Vec<u8> {
        let plain = encode_as(&gradient(width, height), ImageOutputFormat::Jpeg(90));
        let mut exif = b"Exif\0\0MM\0*\0\0\0\x08\0\x01\x88\x25\0\x04\0\0\0\x01\0\0\0\0".to_vec();
        let len = (exif.len() + 2) as u16;
        let mut out = plain[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&len.to_be_bytes());
        out.append(&mut exif);
        out.extend_from_slice(&plain[2..]);
        out
    }

    #[test]
    fn test_jpeg_loses_exif_keeps_dimensions() {
        let original = jpeg_with_exif(64, 48);
        assert!(has_exif(&original));

        let (clean, format) = sanitize_bytes(&original, &SanitizeOptions::default()).unwrap();
        assert_eq!(format, ImageFormat::Jpeg);
        assert_ne!(clean, original);
        assert!(!has_exif(&clean));
        assert_eq!(dimensions(&clean).unwrap(), (64, 48));
    }

    #[test]
    fn test_png_with_alpha_stays_png() {
        let img = DynamicImage::ImageRgba8(ImageBuffer::from_fn(10, 6, |x, _| {
            Rgba([255, 0, 0, (x * 25) as u8])
        }));
        let png = encode_as(&img, ImageOutputFormat::Png);

        let (clean, format) = sanitize_bytes(&png, &SanitizeOptions::default()).unwrap();
        assert_eq!(format, ImageFormat::Png);
        let decoded = decode(&clean).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 6));
        assert!(decoded.color().has_alpha());
    }

    #[test]
    fn test_clean_png_is_rewritten() {
        let png = encode_as(&gradient(32, 32), ImageOutputFormat::Png);
        assert!(!has_exif(&png));

        let (clean, format) = sanitize_bytes(&png, &SanitizeOptions::default()).unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_ne!(clean, png);
        assert_eq!(dimensions(&clean).unwrap(), (32, 32));
        assert_eq!(decode(&clean).unwrap().to_rgb8(), gradient(32, 32).to_rgb8());

        let (again, _) = sanitize_bytes(&clean, &SanitizeOptions::default()).unwrap();
        assert_eq!(again, clean);
    }

    #[test]
    fn test_sanitize_file_renames_and_retypes() {
        let bmp = encode_as(&gradient(5, 5), ImageOutputFormat::Bmp);
        let file = LocalFile::new("scan.bmp", "image/bmp", bmp);

        let clean = sanitize_file(&file).unwrap();
        assert_eq!(clean.name, "scan.png");
        assert_eq!(clean.media_type, "image/png");
        assert!(clean.last_modified >= file.last_modified);
    }

    #[test]
    fn test_sanitize_file_keeps_jpeg_name() {
        let file = LocalFile::new("Beach.JPG", "image/jpeg", jpeg_with_exif(16, 16));
        let clean = sanitize_file(&file).unwrap();
        assert_eq!(clean.name, "Beach.JPG");
        assert_eq!(clean.media_type, "image/jpeg");
    }

    #[test]
    fn test_heic_is_unsupported() {
        let heic = b"\x00\x00\x00\x18ftypheic\x00\x00\x00\x00mif1heic".to_vec();
        let file = LocalFile::new("IMG_0001.HEIC", "image/heic", heic);
        assert!(matches!(sanitize_file(&file), Err(ImageError::UnsupportedFormat("HEIC"))));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let result = sanitize_bytes(b"definitely not an image", &SanitizeOptions::default());
        assert!(matches!(result, Err(ImageError::UnknownFormat)));
    }

    #[test]
    fn test_pixel_limit() {
        let png = encode_as(&gradient(20, 20), ImageOutputFormat::Png);
        let options = SanitizeOptions { max_pixels: Some(100), ..Default::default() };
        assert!(matches!(sanitize_bytes(&png, &options), Err(ImageError::InvalidData(_))));
    }

    #[test]
    fn test_thumbnail_bounds() {
        let png = encode_as(&gradient(400, 100), ImageOutputFormat::Png);
        let thumb = decode(&thumbnail(&png, 64, None).unwrap()).unwrap();
        assert_eq!(thumb.width(), 64);
        assert_eq!(thumb.height(), 16);
    }

    #[test]
    fn test_thumbnail_pixel_limit() {
        let png = encode_as(&gradient(20, 20), ImageOutputFormat::Png);
        assert!(matches!(thumbnail(&png, 64, Some(100)), Err(ImageError::InvalidData(_))));
        assert!(thumbnail(&png, 64, Some(400)).is_ok());
    }
}
