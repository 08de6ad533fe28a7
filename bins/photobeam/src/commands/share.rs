//! Share command: the whole select, strip, upload and link flow

use super::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use photobeam_cli::{output, progress, Status};
use photobeam_core::{process, Error, Expiry, LocalFile, MaxDownloads};
use photobeam_qr::QrBlock;
use photobeam_session::{TempPreviewStore, ViewController, ViewState};
use photobeam_uploader::{HttpUploader, Provider, UploaderConfig};
use serde_json::json;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::warn;

/// Flags of `photobeam share`
pub struct ShareArgs {
    pub path: PathBuf,
    pub strip: bool,
    pub expires: Option<Expiry>,
    pub max_downloads: Option<MaxDownloads>,
    pub provider: Option<Provider>,
    pub endpoint: Option<String>,
    pub timeout: Option<u64>,
    pub qr_out: Option<PathBuf>,
    pub show_qr: bool,
    pub open: bool,
}

impl ShareArgs {
    /// Layer command-line overrides over the configured uploader settings
    fn uploader_config(&self, base: UploaderConfig) -> UploaderConfig {
        let mut config = match self.provider {
            Some(provider) => UploaderConfig::for_provider(provider).with_timeout(base.timeout),
            None => base,
        };
        if let Some(ref endpoint) = self.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

/// Run the share flow for one file
pub async fn run(args: ShareArgs, ctx: &Context) -> Result<()> {
    let json = ctx.format.is_json();
    let schema = &ctx.config.schema;

    let uploader_config = args.uploader_config(ctx.uploader_config().map_err(Error::from)?);
    let provider = uploader_config.provider;
    let uploader = HttpUploader::new(uploader_config).map_err(Error::from)?;

    let file = LocalFile::read(&args.path)?;
    let original_name = file.name.clone();
    let original_size = file.size();

    let mut controller = ViewController::new(uploader, TempPreviewStore::new()?)
        .with_defaults(&schema.defaults)
        .with_qr_size(schema.qr.size);
    if !args.strip {
        controller.set_strip_metadata(false);
    }
    if let Some(expires) = args.expires {
        controller.set_expiry(expires);
    }
    if let Some(max_downloads) = args.max_downloads {
        controller.set_max_downloads(max_downloads);
    }

    let options = controller.options();
    let strip = controller.strip_metadata();

    if !json {
        Status::header(&format!("Sharing {}", original_name));
        Status::field("Size", output::format_size(original_size));
        Status::field("Metadata", if strip { "stripped before upload" } else { "kept" });
        Status::field("Expires", options.expires.label());
        Status::field("Downloads", options.max_downloads.label());
        Status::field("Host", provider);
        println!();
    }

    controller.select_file(Some(file));

    let spinner = progress::spinner_for("Uploading...", json);
    let start = Instant::now();
    let state = controller.upload().await;
    let elapsed = start.elapsed();

    let (result, qr) = match state {
        ViewState::Done { result, qr, .. } => (result, qr),
        ViewState::Error { error, .. } => {
            progress::finish_error(&spinner, "Upload failed");
            return Err(Error::from(error).into());
        }
        other => {
            progress::finish_error(&spinner, "Upload did not run");
            return Err(Error::internal(format!("Upload ended in phase {}", other.phase())).into());
        }
    };
    let took = output::format_duration(elapsed);
    progress::finish_success(&spinner, &format!("Uploaded in {}", took));

    let qr_path = match args.qr_out {
        Some(ref target) => Some(qr.export_svg(ctx.qr_target(target)).map_err(Error::from)?),
        None => None,
    };

    if json {
        output::print_json(&json!({
            "link": result.link,
            "expiry": result.expiry,
            "maxDownloads": result.max_downloads,
            "stripped": strip,
            "file": original_name,
            "provider": provider,
            "qrSvg": qr_path,
        }))?;
    } else {
        print_done(&result.link, qr, qr_path.as_deref(), args.show_qr);
    }

    if args.open {
        if let Err(e) = process::open_url(&result.link) {
            warn!(error = %e.message, "Could not open browser");
            if !json {
                Status::warning(&format!("Could not open a browser: {}", e.message));
            }
        }
    }

    Ok(())
}

fn print_done(link: &str, qr: &QrBlock, qr_path: Option<&std::path::Path>, show_qr: bool) {
    Status::link(link);
    if show_qr {
        println!("{}", qr.to_terminal());
    }
    if let Some(path) = qr_path {
        Status::success(&format!("QR code saved to {}", path.display()));
    }
    println!("  {}", "Anyone with the link can download the file until it expires.".dimmed());
}
