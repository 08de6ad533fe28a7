//! The QR block shown after a successful upload.

use crate::error::{QrError, Result};
use crate::svg;
use qrcode::render::unicode::Dense1x2;
use qrcode::{Color, EcLevel, QrCode};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Rendered edge length in pixels.
pub const DEFAULT_SIZE: u32 = 220;

/// Light modules around the symbol, per side.
pub const QUIET_ZONE: usize = 4;

/// File name used when exporting into a directory.
pub const DEFAULT_FILE_NAME: &str = "photobeam-qr.svg";

/// Media type of the exported file.
pub const SVG_MEDIA_TYPE: &str = "image/svg+xml;charset=utf-8";

/// A link encoded as a QR code.
///
/// # Example
/// ```
/// use photobeam_qr::QrBlock;
///
/// let block = QrBlock::render("https://host/abc123").unwrap();
/// assert_eq!(block.link(), "https://host/abc123");
/// assert!(block.svg().contains(r#"width="220""#));
/// ```
#[derive(Clone)]
pub struct QrBlock {
    link: String,
    code: QrCode,
    size: u32,
    svg: String,
}

impl QrBlock {
    /// Encode `link` at the default size.
    pub fn render(link: &str) -> Result<Self> {
        Self::render_with_size(link, DEFAULT_SIZE)
    }

    /// Encode `link` with error-correction level L and a fixed pixel size.
    pub fn render_with_size(link: &str, size: u32) -> Result<Self> {
        if link.is_empty() {
            return Err(QrError::EmptyLink);
        }
        if size == 0 {
            return Err(QrError::ZeroSize);
        }

        let code = QrCode::with_error_correction_level(link.as_bytes(), EcLevel::L)?;
        let modules: Vec<bool> = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();
        let svg = svg::render(&modules, code.width(), QUIET_ZONE, size);

        debug!(version = ?code.version(), modules = code.width(), size, "Rendered QR code");

        Ok(Self {
            link: link.to_string(),
            code,
            size,
            svg,
        })
    }

    /// The encoded link, unchanged.
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Standalone SVG markup.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Rendered edge length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Modules per side, without the quiet zone.
    pub fn modules(&self) -> usize {
        self.code.width()
    }

    /// Dark/light matrix, row-major, without the quiet zone.
    pub fn colors(&self) -> Vec<bool> {
        self.code.to_colors().into_iter().map(|c| c == Color::Dark).collect()
    }

    /// Write the SVG to `target`.
    ///
    /// An existing directory gets [`DEFAULT_FILE_NAME`] inside it. Returns the
    /// path written.
    pub fn export_svg(&self, target: impl AsRef<Path>) -> Result<PathBuf> {
        let target = target.as_ref();
        let path = if target.is_dir() {
            target.join(DEFAULT_FILE_NAME)
        } else {
            target.to_path_buf()
        };

        fs::write(&path, self.svg.as_bytes()).map_err(|source| QrError::Write {
            path: path.clone(),
            source,
        })?;

        debug!(
            path = %path.display(),
            bytes = self.svg.len(),
            media_type = SVG_MEDIA_TYPE,
            "Exported QR code"
        );
        Ok(path)
    }

    /// Unicode half-block rendering for a terminal, quiet zone included.
    pub fn to_terminal(&self) -> String {
        self.code
            .render::<Dense1x2>()
            .dark_color(Dense1x2::Light)
            .light_color(Dense1x2::Dark)
            .quiet_zone(true)
            .build()
    }
}

impl fmt::Debug for QrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QrBlock")
            .field("link", &self.link)
            .field("modules", &self.code.width())
            .field("size", &self.size)
            .finish()
    }
}

impl PartialEq for QrBlock {
    fn eq(&self, other: &Self) -> bool {
        self.link == other.link && self.size == other.size
    }
}

impl Eq for QrBlock {}
