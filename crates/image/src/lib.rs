//! Image handling for PhotoBeam.
//!
//! This crate provides:
//! - Format detection from magic bytes
//! - Header-only metadata inspection (dimensions, EXIF presence)
//! - Metadata stripping by decoding and re-encoding the pixels
//! - Preview thumbnails

#![warn(missing_docs)]

mod detect;
mod error;
mod metadata;
pub mod naming;

#[cfg(feature = "processing")]
mod alpha;

#[cfg(feature = "processing")]
mod sanitize;

pub use detect::{detect_format, ImageFormat};
pub use error::{ImageError, Result};
pub use metadata::{extract_metadata, has_exif, ImageMetadata};
pub use naming::sanitized_file_name;

#[cfg(feature = "processing")]
pub use alpha::{flatten_alpha, has_alpha_channel};

#[cfg(feature = "processing")]
pub use sanitize::{
    decode, dimensions, output_format_for, sanitize_bytes, sanitize_file,
    sanitize_file_with, thumbnail, SanitizeOptions, SANITIZE_QUALITY,
};
