//! Error types for the image crate.

use photobeam_core::ErrorCode;
use thiserror::Error;

/// Result type alias for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Errors that can occur during image operations.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Unknown image format
    #[error("Unknown image format")]
    UnknownFormat,

    /// Recognised format that cannot be decoded here
    #[error("Cannot decode {0} images")]
    UnsupportedFormat(&'static str),

    /// Invalid image data
    #[error("Invalid image data: {0}")]
    InvalidData(String),

    /// Decoding the bitmap failed
    #[cfg(feature = "processing")]
    #[error("Could not decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// Re-encoding the bitmap failed
    #[cfg(feature = "processing")]
    #[error("Could not encode image: {0}")]
    Encode(#[source] image::ImageError),
}

impl ImageError {
    /// Error code used when reporting this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            ImageError::UnknownFormat | ImageError::UnsupportedFormat(_) => {
                ErrorCode::UnsupportedFormat
            }
            ImageError::InvalidData(_) => ErrorCode::DecodeFailed,
            #[cfg(feature = "processing")]
            ImageError::Decode(_) => ErrorCode::DecodeFailed,
            #[cfg(feature = "processing")]
            ImageError::Encode(_) => ErrorCode::EncodeFailed,
        }
    }
}

impl From<ImageError> for photobeam_core::Error {
    fn from(err: ImageError) -> Self {
        let code = err.code();
        let mut error = photobeam_core::Error::image(code, err.to_string());
        if code == ErrorCode::UnsupportedFormat {
            error = error
                .with_suggestion("Convert the photo to JPEG or PNG first, or disable stripping");
        }
        error.with_source(err)
    }
}
