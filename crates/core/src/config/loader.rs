//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist; without one the standard locations are
    /// searched and defaults are used when none is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let local = [".photobeam.toml", "photobeam.toml"]
        .into_iter()
        .map(PathBuf::from);
    let user = dirs::config_dir().map(|d| d.join("photobeam").join("config.toml"));

    local.chain(user).find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {}", path.display(), e))
            .with_source(e)
    })?;

    let schema: ConfigSchema = toml::from_str(&content).map_err(|e| {
        Error::from(e).with_context(format!("Parsing {}", path.display()))
    })?;
    schema
        .validate()
        .map_err(|e| e.with_context(format!("Checking {}", path.display())))?;

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.qr.size, 220);
    }

    #[test]
    fn test_config_load_explicit_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "[upload]\ntimeout_secs = 12").unwrap();

        let config = Config::load(Some(tmp.path())).unwrap();
        assert_eq!(config.schema.upload.timeout_secs, 12);
        assert_eq!(config.path.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn test_config_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nope/photobeam.toml"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "[upload\nprovider = ").unwrap();

        let err = Config::load(Some(tmp.path())).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_config_load_rejects_zero_qr_size() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "[qr]\nsize = 0").unwrap();

        let err = Config::load(Some(tmp.path())).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
    }
}
