//! QR command: render a code for a link that already exists

use super::Context;
use anyhow::Result;
use photobeam_cli::{output, Status};
use photobeam_core::Error;
use photobeam_qr::{QrBlock, SVG_MEDIA_TYPE};
use serde_json::json;
use std::path::PathBuf;

/// Draw the code for `link`, optionally saving it as SVG
pub fn run(link: &str, target: Option<PathBuf>, size: Option<u32>, ctx: &Context) -> Result<()> {
    let size = size.unwrap_or(ctx.config.schema.qr.size);
    let block = QrBlock::render_with_size(link, size).map_err(Error::from)?;

    let saved = match target {
        Some(ref target) => Some(block.export_svg(ctx.qr_target(target)).map_err(Error::from)?),
        None => None,
    };

    if ctx.format.is_json() {
        output::print_json(&json!({
            "link": block.link(),
            "modules": block.modules(),
            "size": block.size(),
            "svg": saved,
            "mediaType": saved.as_ref().map(|_| SVG_MEDIA_TYPE),
        }))?;
    } else {
        println!("{}", block.to_terminal());
        if let Some(path) = saved {
            Status::success(&format!("Saved {}", path.display()));
        }
    }

    Ok(())
}
