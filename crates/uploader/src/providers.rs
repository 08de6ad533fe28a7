//! Known temporary file hosts.

use crate::error::UploadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the expiry and download cap are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionsPlacement {
    /// Query string: `?expires=24h&maxDownloads=1`
    Query,
    /// Extra multipart text fields next to the file
    Form,
    /// Not sent; the host applies its own policy
    Omit,
}

/// Hosting provider preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    /// file.io: honours expiry and download cap
    #[default]
    FileIo,
    /// tmpfiles.org: fixed one hour retention, no download cap
    #[serde(rename = "tmpfiles")]
    TmpFiles,
}

impl Provider {
    /// All presets.
    pub const ALL: [Provider; 2] = [Provider::FileIo, Provider::TmpFiles];

    /// Config and CLI name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::FileIo => "file-io",
            Provider::TmpFiles => "tmpfiles",
        }
    }

    /// Upload endpoint.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Provider::FileIo => "https://file.io/",
            Provider::TmpFiles => "https://tmpfiles.org/api/v1/upload",
        }
    }

    /// Where options are sent.
    pub fn placement(&self) -> OptionsPlacement {
        match self {
            Provider::FileIo => OptionsPlacement::Query,
            Provider::TmpFiles => OptionsPlacement::Omit,
        }
    }

    /// JSON pointer to the link in a successful response.
    pub fn link_pointer(&self) -> &'static str {
        match self {
            Provider::FileIo => "/link",
            Provider::TmpFiles => "/data/url",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file-io" | "fileio" | "file.io" => Ok(Provider::FileIo),
            "tmpfiles" | "tmpfiles.org" => Ok(Provider::TmpFiles),
            other => Err(UploadError::config(format!(
                "unknown provider `{}` (expected one of: file-io, tmpfiles)",
                other
            ))),
        }
    }
}
