//! QR codes for share links.
//!
//! [`QrBlock`] encodes a link exactly as given and renders it as standalone
//! SVG markup (for display and download) or as Unicode half blocks for a
//! terminal.

#![warn(missing_docs)]

mod block;
mod error;
mod svg;

pub use block::{QrBlock, DEFAULT_FILE_NAME, DEFAULT_SIZE, QUIET_ZONE, SVG_MEDIA_TYPE};
pub use error::{QrError, Result};
