//! Subcommand implementations

pub mod config;
pub mod inspect;
pub mod qr;
pub mod sanitize;
pub mod share;

use photobeam_cli::OutputFormat;
use photobeam_core::config::Config;
use photobeam_uploader::UploaderConfig;
use std::path::{Path, PathBuf};

/// Settings shared by every command
pub struct Context {
    pub format: OutputFormat,
    pub verbose: bool,
    pub config: Config,
}

impl Context {
    /// Uploader settings from the config file and `PHOTOBEAM_*` variables
    pub fn uploader_config(&self) -> photobeam_uploader::Result<UploaderConfig> {
        UploaderConfig::from_schema(&self.config.schema.upload)?.apply_env()
    }

    /// SVG target: a directory gets the configured file name inside it
    pub fn qr_target(&self, target: &Path) -> PathBuf {
        if target.is_dir() {
            target.join(&self.config.schema.qr.file_name)
        } else {
            target.to_path_buf()
        }
    }
}
