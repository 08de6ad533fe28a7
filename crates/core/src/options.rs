//! Upload options: how long a hosted file lives and how often it can be fetched.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Lifetime bucket of a hosted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Expiry {
    /// 30 minutes
    #[serde(rename = "30m")]
    ThirtyMinutes,
    /// 1 hour
    #[serde(rename = "1h")]
    OneHour,
    /// 24 hours
    #[default]
    #[serde(rename = "24h")]
    OneDay,
    /// 7 days
    #[serde(rename = "7d")]
    OneWeek,
}

impl Expiry {
    /// All buckets, shortest first.
    pub const ALL: [Expiry; 4] = [
        Expiry::ThirtyMinutes,
        Expiry::OneHour,
        Expiry::OneDay,
        Expiry::OneWeek,
    ];

    /// Wire value sent to the host (`30m`, `1h`, `24h`, `7d`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Expiry::ThirtyMinutes => "30m",
            Expiry::OneHour => "1h",
            Expiry::OneDay => "24h",
            Expiry::OneWeek => "7d",
        }
    }

    /// Human label for menus and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Expiry::ThirtyMinutes => "30 minutes",
            Expiry::OneHour => "1 hour",
            Expiry::OneDay => "24 hours",
            Expiry::OneWeek => "7 days",
        }
    }

    /// Bucket length.
    pub fn duration(&self) -> Duration {
        match self {
            Expiry::ThirtyMinutes => Duration::from_secs(30 * 60),
            Expiry::OneHour => Duration::from_secs(60 * 60),
            Expiry::OneDay => Duration::from_secs(24 * 60 * 60),
            Expiry::OneWeek => Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Expiry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Expiry::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::invalid_input(format!("Unknown expiry `{}`", s))
                    .with_suggestion("Use one of: 30m, 1h, 24h, 7d")
            })
    }
}

/// Maximum number of downloads before the hosted file disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum MaxDownloads {
    /// One recipient
    #[default]
    Single,
    /// A small group (~20)
    Group,
}

impl MaxDownloads {
    /// Both caps, smallest first.
    pub const ALL: [MaxDownloads; 2] = [MaxDownloads::Single, MaxDownloads::Group];

    /// Numeric cap sent to the host.
    pub fn count(&self) -> u32 {
        match self {
            MaxDownloads::Single => 1,
            MaxDownloads::Group => 20,
        }
    }

    /// Human label for menus and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            MaxDownloads::Single => "Single (1)",
            MaxDownloads::Group => "Group (~20)",
        }
    }
}

impl fmt::Display for MaxDownloads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

impl TryFrom<u32> for MaxDownloads {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            1 => Ok(MaxDownloads::Single),
            20 => Ok(MaxDownloads::Group),
            other => Err(Error::invalid_input(format!("Unsupported download cap {}", other))
                .with_suggestion("Use 1 (single) or 20 (group)")),
        }
    }
}

impl From<MaxDownloads> for u32 {
    fn from(value: MaxDownloads) -> Self {
        value.count()
    }
}

impl FromStr for MaxDownloads {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| Error::invalid_input(format!("Download cap `{}` is not a number", s)))?;
        MaxDownloads::try_from(value)
    }
}

/// Options sent with every upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOptions {
    /// Expiry bucket
    pub expires: Expiry,
    /// Download cap
    pub max_downloads: MaxDownloads,
}

impl UploadOptions {
    /// Create options from both values.
    pub fn new(expires: Expiry, max_downloads: MaxDownloads) -> Self {
        Self { expires, max_downloads }
    }

    /// Key/value pairs as the host expects them.
    pub fn as_params(&self) -> [(&'static str, String); 2] {
        [
            ("expires", self.expires.as_str().to_string()),
            ("maxDownloads", self.max_downloads.count().to_string()),
        ]
    }
}
