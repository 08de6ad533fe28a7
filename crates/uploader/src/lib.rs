//! Anonymous upload of a single file to a temporary file host.
//!
//! One [`Uploader`] abstraction covers every host. Which host, where the
//! options go and where the link sits in the response are configuration
//! ([`UploaderConfig`]), with presets for the supported [`Provider`]s.
//!
//! # Example
//!
//! ```rust,no_run
//! use photobeam_core::{LocalFile, UploadOptions};
//! use photobeam_uploader::{HttpUploader, Uploader, UploaderConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let uploader = HttpUploader::new(UploaderConfig::default())?;
//! let file = LocalFile::read("holiday.jpg")?;
//!
//! let result = uploader.upload(&file, &UploadOptions::default()).await?;
//! println!("{} (expires {})", result.link, result.expiry);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod providers;
mod response;
mod uploader;

pub use client::HostClient;
pub use config::UploaderConfig;
pub use error::{Result, UploadError};
pub use providers::{OptionsPlacement, Provider};
pub use response::extract_link;
pub use uploader::{HttpUploader, UploadResult, Uploader};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::UploaderConfig;
    pub use crate::error::UploadError;
    pub use crate::providers::{OptionsPlacement, Provider};
    pub use crate::uploader::{HttpUploader, UploadResult, Uploader};
}
