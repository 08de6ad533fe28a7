//! PhotoBeam - share a photo without its metadata
//!
//! Strips EXIF and other metadata by re-encoding, uploads the result to a
//! temporary file host and prints the link with a QR code.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use photobeam_cli::{output, OutputFormat, Status};
use photobeam_core::config::Config;
use photobeam_core::error::exit_codes;
use photobeam_core::{Expiry, MaxDownloads};
use photobeam_uploader::Provider;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Context;

/// Share a photo without its metadata
#[derive(Parser)]
#[command(name = "photobeam")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Configuration file (defaults to .photobeam.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip metadata, upload, and print the link with a QR code
    Share {
        /// Photo to share
        path: PathBuf,

        /// Upload the file as is, metadata included
        #[arg(long)]
        no_strip: bool,

        /// How long the link stays valid (30m, 1h, 24h, 7d)
        #[arg(short, long)]
        expires: Option<Expiry>,

        /// How many downloads are allowed (1 or 20)
        #[arg(short, long)]
        max_downloads: Option<MaxDownloads>,

        /// Hosting provider preset
        #[arg(long)]
        provider: Option<Provider>,

        /// Upload endpoint (overrides the provider's)
        #[arg(long)]
        endpoint: Option<String>,

        /// Request timeout in seconds
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Also save the QR code as SVG (file or directory)
        #[arg(long)]
        qr_out: Option<PathBuf>,

        /// Do not draw the QR code in the terminal
        #[arg(long)]
        no_qr: bool,

        /// Open the link in the default browser
        #[arg(long)]
        open: bool,
    },

    /// Strip metadata from a photo without uploading it
    Sanitize {
        /// Photo to clean
        input: PathBuf,

        /// Where to write the result (defaults to <name>-clean.<ext> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a QR code for an existing link
    Qr {
        /// Link to encode
        link: String,

        /// Save the SVG to this file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// SVG edge length in pixels
        #[arg(long)]
        size: Option<u32>,
    },

    /// Show format, dimensions and whether EXIF data is present
    Inspect {
        /// Image to inspect
        path: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "photobeam=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let ctx = Context {
        format: cli.format,
        verbose: cli.verbose,
        config,
    };

    match cli.command {
        Commands::Share {
            path,
            no_strip,
            expires,
            max_downloads,
            provider,
            endpoint,
            timeout,
            qr_out,
            no_qr,
            open,
        } => {
            let args = commands::share::ShareArgs {
                path,
                strip: !no_strip,
                expires,
                max_downloads,
                provider,
                endpoint,
                timeout,
                qr_out,
                show_qr: !no_qr,
                open,
            };
            commands::share::run(args, &ctx).await
        }
        Commands::Sanitize { input, output } => commands::sanitize::run(&input, output, &ctx),
        Commands::Qr { link, output, size } => commands::qr::run(&link, output, size, &ctx),
        Commands::Inspect { path } => commands::inspect::run(&path, &ctx),
        Commands::Config => commands::config::run(&ctx),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let format = cli.format;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<photobeam_core::Error>() {
            Some(err) => {
                if format.is_json() {
                    let _ = output::print_json(&serde_json::json!({ "error": err.to_report() }));
                } else {
                    Status::report(err);
                }
                ExitCode::from(err.code.exit_code() as u8)
            }
            None => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                ExitCode::from(exit_codes::FAILURE as u8)
            }
        },
    }
}
