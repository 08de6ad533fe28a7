//! Configuration for the uploader
//!
//! Built from the `[upload]` table of the config file, then overridden by
//! environment variables and command-line flags.

use crate::error::{Result, UploadError};
use crate::providers::{OptionsPlacement, Provider};
use photobeam_core::config::UploadConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default client-side timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable selecting the provider preset
pub const ENV_PROVIDER: &str = "PHOTOBEAM_PROVIDER";
/// Environment variable overriding the endpoint
pub const ENV_ENDPOINT: &str = "PHOTOBEAM_ENDPOINT";
/// Environment variable overriding the timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "PHOTOBEAM_TIMEOUT_SECS";

/// Uploader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploaderConfig {
    /// Preset the endpoint settings came from
    pub provider: Provider,
    /// Upload URL
    pub endpoint: String,
    /// Where expiry and download cap are sent
    pub placement: OptionsPlacement,
    /// JSON pointer to the link in the response
    pub link_pointer: String,
    /// Client-side timeout
    #[serde(with = "secs")]
    pub timeout: Duration,
}

mod secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self::for_provider(Provider::default())
    }
}

impl UploaderConfig {
    /// Preset settings for a provider
    #[must_use]
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider,
            endpoint: provider.endpoint().to_string(),
            placement: provider.placement(),
            link_pointer: provider.link_pointer().to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build from the `[upload]` config table
    pub fn from_schema(schema: &UploadConfig) -> Result<Self> {
        let provider: Provider = schema.provider.parse()?;
        let mut config =
            Self::for_provider(provider).with_timeout(Duration::from_secs(schema.timeout_secs));

        if let Some(ref endpoint) = schema.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(ref pointer) = schema.link_pointer {
            config = config.with_link_pointer(pointer.clone());
        }

        Ok(config)
    }

    /// Apply `PHOTOBEAM_PROVIDER`, `PHOTOBEAM_ENDPOINT` and
    /// `PHOTOBEAM_TIMEOUT_SECS`
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_from(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// A provider override resets endpoint, placement and pointer to that
    /// preset before the endpoint override is applied.
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(provider) = lookup(ENV_PROVIDER).filter(|v| !v.trim().is_empty()) {
            let timeout = self.timeout;
            self = Self::for_provider(provider.parse()?).with_timeout(timeout);
        }

        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                UploadError::config(format!(
                    "{} must be a whole number of seconds, got `{}`",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
            self.timeout = Duration::from_secs(secs);
        }

        Ok(self)
    }

    /// Builder-style method to set the endpoint
    #[must_use]
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Builder-style method to set the link pointer
    #[must_use]
    pub fn with_link_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.link_pointer = pointer.into();
        self
    }

    /// Builder-style method to set where options go
    #[must_use]
    pub fn with_placement(mut self, placement: OptionsPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(UploadError::config("endpoint cannot be empty"));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(UploadError::config("endpoint must start with http:// or https://"));
        }

        if self.timeout.is_zero() {
            return Err(UploadError::config("timeout cannot be zero"));
        }

        if !self.link_pointer.starts_with('/') {
            return Err(UploadError::config(
                "link_pointer must be a JSON pointer starting with `/`",
            ));
        }

        Ok(())
    }
}
