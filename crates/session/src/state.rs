//! View state: one value per phase, carrying only what that phase allows.

use crate::preview::PreviewHandle;
use photobeam_core::{ErrorReport, LocalFile};
use photobeam_qr::QrBlock;
use photobeam_uploader::UploadResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the share flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing picked yet
    Unselected,
    /// A file is picked and can be uploaded
    Selected,
    /// Sanitizing and uploading
    Uploading,
    /// Link available
    Done,
    /// The last attempt failed
    Error,
}

impl Phase {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Unselected => "unselected",
            Phase::Selected => "selected",
            Phase::Uploading => "uploading",
            Phase::Done => "done",
            Phase::Error => "error",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the view shows.
///
/// A link exists only in `Done`, an error only in `Error`, and every phase but
/// `Unselected` holds the selected file and its preview.
#[derive(Debug, Default)]
pub enum ViewState {
    /// Nothing picked yet
    #[default]
    Unselected,
    /// A file is picked
    Selected {
        /// The picked file
        file: LocalFile,
        /// Its preview
        preview: PreviewHandle,
    },
    /// Upload in flight
    Uploading {
        /// The picked file (before sanitizing)
        file: LocalFile,
        /// Its preview
        preview: PreviewHandle,
    },
    /// Upload finished
    Done {
        /// The picked file
        file: LocalFile,
        /// Its preview
        preview: PreviewHandle,
        /// Link and echoed options
        result: UploadResult,
        /// QR code for the link
        qr: QrBlock,
    },
    /// Upload failed
    Error {
        /// The picked file
        file: LocalFile,
        /// Its preview
        preview: PreviewHandle,
        /// What went wrong
        error: ErrorReport,
    },
}

impl ViewState {
    /// Current phase.
    pub fn phase(&self) -> Phase {
        match self {
            ViewState::Unselected => Phase::Unselected,
            ViewState::Selected { .. } => Phase::Selected,
            ViewState::Uploading { .. } => Phase::Uploading,
            ViewState::Done { .. } => Phase::Done,
            ViewState::Error { .. } => Phase::Error,
        }
    }

    /// The selected file, if any.
    pub fn file(&self) -> Option<&LocalFile> {
        match self {
            ViewState::Unselected => None,
            ViewState::Selected { file, .. }
            | ViewState::Uploading { file, .. }
            | ViewState::Done { file, .. }
            | ViewState::Error { file, .. } => Some(file),
        }
    }

    /// The live preview, if any.
    pub fn preview(&self) -> Option<&PreviewHandle> {
        match self {
            ViewState::Unselected => None,
            ViewState::Selected { preview, .. }
            | ViewState::Uploading { preview, .. }
            | ViewState::Done { preview, .. }
            | ViewState::Error { preview, .. } => Some(preview),
        }
    }

    /// Upload result (only in `Done`).
    pub fn result(&self) -> Option<&UploadResult> {
        match self {
            ViewState::Done { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Share link (only in `Done`).
    pub fn link(&self) -> Option<&str> {
        self.result().map(|r| r.link.as_str())
    }

    /// QR code for the link (only in `Done`).
    pub fn qr(&self) -> Option<&QrBlock> {
        match self {
            ViewState::Done { qr, .. } => Some(qr),
            _ => None,
        }
    }

    /// Failure report (only in `Error`).
    pub fn error(&self) -> Option<&ErrorReport> {
        match self {
            ViewState::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Take the file and preview out, dropping everything else.
    pub(crate) fn into_selection(self) -> Option<(LocalFile, PreviewHandle)> {
        match self {
            ViewState::Unselected => None,
            ViewState::Selected { file, preview }
            | ViewState::Uploading { file, preview }
            | ViewState::Done { file, preview, .. }
            | ViewState::Error { file, preview, .. } => Some((file, preview)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn selected() -> ViewState {
        ViewState::Selected {
            file: LocalFile::new("a.jpg", "image/jpeg", vec![1, 2, 3]),
            preview: PreviewHandle::new(Uuid::new_v4(), None),
        }
    }

    #[test]
    fn test_unselected_is_empty() {
        let state = ViewState::default();
        assert_eq!(state.phase(), Phase::Unselected);
        assert!(state.file().is_none());
        assert!(state.preview().is_none());
        assert!(state.link().is_none());
        assert!(state.error().is_none());
        assert!(state.into_selection().is_none());
    }

    #[test]
    fn test_selected_accessors() {
        let state = selected();
        assert_eq!(state.phase(), Phase::Selected);
        assert_eq!(state.file().map(|f| f.name.as_str()), Some("a.jpg"));
        assert!(state.link().is_none());
        assert!(state.qr().is_none());

        let (file, _preview) = state.into_selection().unwrap();
        assert_eq!(file.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Uploading.to_string(), "uploading");
        assert_eq!(Phase::Error.as_str(), "error");
    }
}
