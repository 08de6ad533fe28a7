//! Config command: show the settings a share would use

use super::Context;
use anyhow::Result;
use photobeam_cli::{output, Status};
use photobeam_core::Error;
use serde_json::json;

/// Print the loaded config file and the resolved uploader settings
pub fn run(ctx: &Context) -> Result<()> {
    let uploader = ctx.uploader_config().map_err(Error::from)?;
    let source = ctx
        .config
        .path
        .as_ref()
        .map(|p| p.display().to_string());

    if ctx.format.is_json() {
        output::print_json(&json!({
            "source": source,
            "config": ctx.config.schema,
            "uploader": uploader,
        }))?;
        return Ok(());
    }

    Status::header("Configuration");
    Status::field("Source", source.as_deref().unwrap_or("built-in defaults"));
    println!();
    print!("{}", toml::to_string_pretty(&ctx.config.schema)?);

    Status::header("Effective uploader");
    Status::field("Provider", uploader.provider);
    Status::field("Endpoint", &uploader.endpoint);
    Status::field("Options", format!("{:?}", uploader.placement).to_lowercase());
    Status::field("Link pointer", &uploader.link_pointer);
    Status::field("Timeout", format!("{}s", uploader.timeout.as_secs()));
    if ctx.verbose {
        Status::info(
            "PHOTOBEAM_PROVIDER, PHOTOBEAM_ENDPOINT and PHOTOBEAM_TIMEOUT_SECS override the file",
        );
    }

    Ok(())
}
