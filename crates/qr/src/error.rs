//! Error types for QR rendering.

use photobeam_core::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for QR operations.
pub type Result<T> = std::result::Result<T, QrError>;

/// Errors that can occur while rendering or exporting a QR code.
#[derive(Debug, Error)]
pub enum QrError {
    /// Nothing to encode
    #[error("Cannot render a QR code for an empty link")]
    EmptyLink,

    /// Requested pixel size is zero
    #[error("QR code size must be at least 1 pixel")]
    ZeroSize,

    /// Link does not fit in a QR code
    #[error("Link cannot be encoded: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// Writing the SVG file failed
    #[error("Could not write {}: {source}", path.display())]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl From<QrError> for photobeam_core::Error {
    fn from(err: QrError) -> Self {
        let code = match err {
            QrError::EmptyLink | QrError::ZeroSize | QrError::Encode(_) => ErrorCode::InvalidInput,
            QrError::Write { .. } => ErrorCode::IoError,
        };
        photobeam_core::Error::new(code, err.to_string()).with_source(err)
    }
}
