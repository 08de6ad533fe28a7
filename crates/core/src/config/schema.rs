//! Configuration schema definitions

use crate::error::{Error, Result};
use crate::options::{Expiry, MaxDownloads, UploadOptions};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub qr: QrConfig,
}

impl ConfigSchema {
    /// Reject values that parse but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.qr.size == 0 {
            return Err(Error::invalid_config_value("qr.size", "must be at least 1 pixel"));
        }
        if self.qr.file_name.trim().is_empty() {
            return Err(Error::invalid_config_value("qr.file_name", "cannot be empty"));
        }
        Ok(())
    }
}

/// Where uploads go
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadConfig {
    /// Hosting provider preset (`file-io`, `tmpfiles`)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Endpoint override; the preset's endpoint is used when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    /// JSON pointer to the link in the response; the preset's when unset
    #[serde(default)]
    pub link_pointer: Option<String>,

    /// Client-side timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: None,
            link_pointer: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "file-io".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Option values preselected for each upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    /// Re-encode images to drop metadata before upload
    #[serde(default = "default_true")]
    pub strip_metadata: bool,

    /// Expiry bucket
    #[serde(default)]
    pub expiry: Expiry,

    /// Download cap (1 or 20)
    #[serde(default)]
    pub max_downloads: MaxDownloads,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            strip_metadata: true,
            expiry: Expiry::default(),
            max_downloads: MaxDownloads::default(),
        }
    }
}

impl DefaultsConfig {
    /// Upload options described by these defaults.
    pub fn upload_options(&self) -> UploadOptions {
        UploadOptions::new(self.expiry, self.max_downloads)
    }
}

fn default_true() -> bool {
    true
}

/// QR rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QrConfig {
    /// Rendered edge length in pixels
    #[serde(default = "default_qr_size")]
    pub size: u32,

    /// File name used when exporting the SVG into a directory
    #[serde(default = "default_qr_file_name")]
    pub file_name: String,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            size: default_qr_size(),
            file_name: default_qr_file_name(),
        }
    }
}

fn default_qr_size() -> u32 {
    220
}

fn default_qr_file_name() -> String {
    "photobeam-qr.svg".to_string()
}
