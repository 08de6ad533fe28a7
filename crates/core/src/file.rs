//! The user-selected file held in memory.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::Path;

/// Media type used when nothing better is known.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// A file picked by the user: raw bytes plus name, media type and timestamp.
///
/// Cloning copies the payload; the session keeps one copy per phase and the
/// sanitizer produces an independent value.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// File name without directories (e.g. `IMG_0042.heic`)
    pub name: String,
    /// Media type (e.g. `image/jpeg`)
    pub media_type: String,
    /// Last modification time
    pub last_modified: DateTime<Utc>,
    /// File contents
    pub bytes: Vec<u8>,
}

impl LocalFile {
    /// Create a file stamped with the current time.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            last_modified: Utc::now(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its media type from the extension.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(path)
            } else {
                Error::from(e).with_context(format!("Reading {}", path.display()))
            }
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let last_modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(Self {
            media_type: media_type_for_name(&name).to_string(),
            name,
            last_modified,
            bytes,
        })
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Lowercased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    /// Whether the media type claims to be an image.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

impl fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("last_modified", &self.last_modified)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Guess a media type from a file name, the way a browser file picker does.
pub fn media_type_for_name(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "svg" => "image/svg+xml",
        _ => FALLBACK_MEDIA_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_media_type_for_name() {
        assert_eq!(media_type_for_name("a.JPG"), "image/jpeg");
        assert_eq!(media_type_for_name("b.heic"), "image/heic");
        assert_eq!(media_type_for_name("c.tiff"), "image/tiff");
        assert_eq!(media_type_for_name("no_extension"), FALLBACK_MEDIA_TYPE);
    }

    #[test]
    fn test_read_file() {
        let mut tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        tmp.write_all(b"\x89PNG\r\n\x1a\n").unwrap();

        let file = LocalFile::read(tmp.path()).unwrap();
        assert_eq!(file.media_type, "image/png");
        assert_eq!(file.size(), 8);
        assert_eq!(file.extension().as_deref(), Some("png"));
        assert!(file.is_image());
    }

    #[test]
    fn test_read_missing_file() {
        let err = LocalFile::read("/definitely/not/here.jpg").unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::FileNotFound);
    }

    #[test]
    fn test_debug_hides_payload() {
        let file = LocalFile::new("x.jpg", "image/jpeg", vec![0u8; 4096]);
        let debug = format!("{:?}", file);
        assert!(debug.contains("size: 4096"));
        assert!(!debug.contains("[0, 0"));
    }
}
