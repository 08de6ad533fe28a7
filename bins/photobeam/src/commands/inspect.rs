//! Inspect command: what would be stripped

use super::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use photobeam_cli::{output, Status};
use photobeam_core::Error;
use photobeam_image::{detect_format, extract_metadata, has_exif};
use serde_json::json;
use std::path::Path;

/// Print format, dimensions and EXIF presence for an image
pub fn run(path: &Path, ctx: &Context) -> Result<()> {
    let data = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path)
        } else {
            Error::from(e)
        }
    })?;

    let format = detect_format(&data).map_err(Error::from)?;
    let meta = extract_metadata(&data);
    let exif = has_exif(&data);

    if ctx.format.is_json() {
        output::print_json(&json!({
            "path": path,
            "format": format,
            "mediaType": format.mime_type(),
            "sizeBytes": data.len(),
            "width": meta.as_ref().map(|m| m.width),
            "height": meta.as_ref().map(|m| m.height),
            "hasExif": exif,
            "decodable": format.is_decodable(),
        }))?;
        return Ok(());
    }

    Status::header(&path.display().to_string());
    Status::field("Format", format!("{} ({})", format.name(), format.mime_type()));
    Status::field("Size", output::format_size(data.len() as u64));
    if let Some(meta) = meta {
        Status::field("Dimensions", format!("{}x{}", meta.width, meta.height));
        Status::field("Orientation", meta.orientation());
    }
    if exif {
        Status::field("EXIF", "present".yellow());
    } else {
        Status::field("EXIF", "none".green());
    }
    if !format.is_decodable() {
        Status::warning(&format!(
            "{} cannot be re-encoded here; convert it before sharing with metadata stripped",
            format.name()
        ));
    }

    Ok(())
}
