//! Core types for PhotoBeam
//!
//! This crate provides the pieces shared by every other PhotoBeam crate:
//!
//! - **Error handling**: errors with codes, context and recovery suggestions
//! - **Files**: the in-memory `LocalFile` picked by the user
//! - **Upload options**: expiry buckets and download caps
//! - **Configuration**: TOML-based configuration with defaults
//! - **Process helpers**: opening a link with the system handler
//!
//! # Example
//!
//! ```rust,no_run
//! use photobeam_core::{config::Config, LocalFile};
//!
//! let config = Config::load(None).expect("config");
//! let file = LocalFile::read("holiday.jpg").expect("readable file");
//! println!("{} ({}), expiry {}", file.name, file.media_type, config.schema.defaults.expiry);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod file;
pub mod options;
pub mod process;

pub use error::{Error, ErrorCode, ErrorReport, Result};
pub use file::LocalFile;
pub use options::{Expiry, MaxDownloads, UploadOptions};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, ErrorReport, Result};
    pub use crate::file::LocalFile;
    pub use crate::options::{Expiry, MaxDownloads, UploadOptions};
}
