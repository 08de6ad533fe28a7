//! Sanitize command: strip metadata locally, no upload

use super::Context;
use anyhow::Result;
use photobeam_cli::{output, Status};
use photobeam_core::{Error, LocalFile};
use photobeam_image::has_exif;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Re-encode `input` without metadata and write it next to it (or to `dest`)
pub fn run(input: &Path, dest: Option<PathBuf>, ctx: &Context) -> Result<()> {
    let file = LocalFile::read(input)?;
    let clean = photobeam_image::sanitize_file(&file).map_err(Error::from)?;

    let target = dest.unwrap_or_else(|| default_output(input, &clean.name));
    if same_file(input, &target) {
        return Err(Error::invalid_input("Refusing to overwrite the input file")
            .with_suggestion("Pass a different path with --output")
            .into());
    }
    std::fs::write(&target, &clean.bytes)
        .map_err(|e| Error::from(e).with_context(format!("Writing {}", target.display())))?;

    let exif_before = has_exif(&file.bytes);
    let exif_after = has_exif(&clean.bytes);

    if ctx.format.is_json() {
        output::print_json(&json!({
            "input": input,
            "output": target,
            "mediaType": clean.media_type,
            "sizeBefore": file.size(),
            "sizeAfter": clean.size(),
            "exifBefore": exif_before,
            "exifAfter": exif_after,
        }))?;
    } else {
        Status::success(&format!("Wrote {}", target.display()));
        Status::field(
            "Size",
            format!(
                "{} -> {} ({})",
                output::format_size(file.size()),
                output::format_size(clean.size()),
                output::format_size_change(file.size(), clean.size())
            ),
        );
        Status::field("EXIF", if exif_before { "removed" } else { "none found" });
    }

    Ok(())
}

/// `<dir>/<stem>-clean.<ext>` using the sanitized file's extension
fn default_output(input: &Path, clean_name: &str) -> PathBuf {
    let file_name = match clean_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-clean.{}", stem, ext),
        _ => format!("{}-clean", clean_name),
    };
    input.with_file_name(file_name)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
