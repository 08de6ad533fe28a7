//! Local preview resources.
//!
//! A preview exists from selection until the file is replaced or the session
//! is reset. Handles are move-only, so each one is revoked at most once.

use photobeam_core::{Error, LocalFile, Result};
use photobeam_image::SanitizeOptions;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};
use uuid::Uuid;

/// Longest edge of a preview thumbnail, in pixels.
pub const THUMBNAIL_EDGE: u32 = 256;

/// A live preview resource.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    id: Uuid,
    path: Option<PathBuf>,
}

impl PreviewHandle {
    /// Create a handle; `path` is `None` when no preview could be produced.
    pub fn new(id: Uuid, path: Option<PathBuf>) -> Self {
        Self { id, path }
    }

    /// Unique ID of this preview.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Location of the rendered preview, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Creates and releases previews for selected files.
pub trait PreviewStore: Send {
    /// Create a preview for `file`. Never fails; a file that cannot be
    /// previewed gets a handle without a path.
    fn create(&mut self, file: &LocalFile) -> PreviewHandle;

    /// Release a preview.
    fn revoke(&mut self, handle: PreviewHandle);
}

/// PNG thumbnails in a private temporary directory.
///
/// The directory and anything left in it are removed when the store is
/// dropped.
pub struct TempPreviewStore {
    dir: TempDir,
    max_pixels: Option<u64>,
}

impl TempPreviewStore {
    /// Create a store backed by a fresh temporary directory.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("photobeam-preview-")
            .tempdir()
            .map_err(|e| Error::from(e).with_context("Creating preview directory"))?;
        Ok(Self {
            dir,
            max_pixels: SanitizeOptions::default().max_pixels,
        })
    }

    /// Skip previews for images above this many pixels (`None` for no limit).
    #[must_use]
    pub fn with_max_pixels(mut self, max_pixels: Option<u64>) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    /// Directory holding the thumbnails.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

impl PreviewStore for TempPreviewStore {
    fn create(&mut self, file: &LocalFile) -> PreviewHandle {
        let id = Uuid::new_v4();
        let path = self.dir.path().join(format!("{id}.png"));

        let written = photobeam_image::thumbnail(&file.bytes, THUMBNAIL_EDGE, self.max_pixels)
            .map_err(Error::from)
            .and_then(|png| fs::write(&path, png).map_err(Error::from));

        match written {
            Ok(()) => {
                debug!(%id, file = %file.name, "Created preview");
                PreviewHandle::new(id, Some(path))
            }
            Err(e) => {
                warn!(%id, file = %file.name, error = %e.message, "No preview available");
                PreviewHandle::new(id, None)
            }
        }
    }

    fn revoke(&mut self, handle: PreviewHandle) {
        if let Some(path) = handle.path {
            if let Err(e) = fs::remove_file(&path) {
                warn!(id = %handle.id, error = %e, "Could not remove preview");
            }
        }
        debug!(id = %handle.id, "Revoked preview");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use std::io::Cursor;

    fn png_file(width: u32, height: u32) -> LocalFile {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .unwrap();
        LocalFile::new("shot.png", "image/png", buffer.into_inner())
    }

    #[test]
    fn test_create_and_revoke() {
        let mut store = TempPreviewStore::new().unwrap();
        let handle = store.create(&png_file(600, 300));

        let path = handle.path().unwrap().to_path_buf();
        assert!(path.starts_with(store.dir()));
        let thumb = image::open(&path).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (THUMBNAIL_EDGE, THUMBNAIL_EDGE / 2));

        store.revoke(handle);
        assert!(!path.exists());
    }

    #[test]
    fn test_unpreviewable_file() {
        let mut store = TempPreviewStore::new().unwrap();
        let handle = store.create(&LocalFile::new("notes.txt", "text/plain", b"hello".to_vec()));
        assert!(handle.path().is_none());
        store.revoke(handle);
    }

    #[test]
    fn test_oversized_image_is_not_decoded() {
        let mut store = TempPreviewStore::new().unwrap().with_max_pixels(Some(100));
        let handle = store.create(&png_file(20, 20));
        assert!(handle.path().is_none());
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 0);
        store.revoke(handle);
    }

    #[test]
    fn test_handles_are_unique() {
        let mut store = TempPreviewStore::new().unwrap();
        let file = png_file(4, 4);
        let a = store.create(&file);
        let b = store.create(&file);
        assert_ne!(a.id(), b.id());
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 2);
    }
}
