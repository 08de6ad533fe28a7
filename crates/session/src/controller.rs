//! State transitions of the share flow.

use crate::preview::PreviewStore;
use crate::state::{Phase, ViewState};
use photobeam_core::config::DefaultsConfig;
use photobeam_core::{Error, Expiry, LocalFile, MaxDownloads, Result, UploadOptions};
use photobeam_qr::{QrBlock, DEFAULT_SIZE};
use photobeam_uploader::{UploadResult, Uploader};
use std::any::Any;
use std::mem;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

/// Metadata stripping step run before upload.
pub type SanitizeFn = fn(&LocalFile) -> photobeam_image::Result<LocalFile>;

/// Owns the view state and the upload options.
///
/// `upload` takes `&mut self`, so only one upload can be in flight.
pub struct ViewController<U: Uploader, P: PreviewStore> {
    uploader: U,
    previews: P,
    state: ViewState,
    strip_metadata: bool,
    options: UploadOptions,
    qr_size: u32,
    sanitize: SanitizeFn,
}

impl<U: Uploader, P: PreviewStore> ViewController<U, P> {
    /// Controller with default options: strip on, 24h, single download.
    pub fn new(uploader: U, previews: P) -> Self {
        Self {
            uploader,
            previews,
            state: ViewState::Unselected,
            strip_metadata: true,
            options: UploadOptions::default(),
            qr_size: DEFAULT_SIZE,
            sanitize: photobeam_image::sanitize_file,
        }
    }

    /// Take the initial options from the `[defaults]` config table.
    #[must_use]
    pub fn with_defaults(mut self, defaults: &DefaultsConfig) -> Self {
        self.strip_metadata = defaults.strip_metadata;
        self.options = defaults.upload_options();
        self
    }

    /// Pixel size of rendered QR codes.
    #[must_use]
    pub fn with_qr_size(mut self, size: u32) -> Self {
        self.qr_size = size;
        self
    }

    /// Replace the metadata stripping step.
    #[must_use]
    pub fn with_sanitizer(mut self, sanitize: SanitizeFn) -> Self {
        self.sanitize = sanitize;
        self
    }

    /// Current view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Whether metadata is stripped before upload.
    pub fn strip_metadata(&self) -> bool {
        self.strip_metadata
    }

    /// Expiry and download cap for the next upload.
    pub fn options(&self) -> UploadOptions {
        self.options
    }

    /// The uploader in use.
    pub fn uploader(&self) -> &U {
        &self.uploader
    }

    /// The preview store in use.
    pub fn previews(&self) -> &P {
        &self.previews
    }

    /// Pick a file, or clear the selection with `None`.
    ///
    /// The old preview is revoked before a new one is created. Any link or
    /// error from a previous attempt is dropped.
    pub fn select_file(&mut self, file: Option<LocalFile>) {
        self.release_preview();

        self.state = match file {
            Some(file) => {
                let preview = self.previews.create(&file);
                info!(
                    file = %file.name,
                    size = file.size(),
                    media_type = %file.media_type,
                    "File selected"
                );
                ViewState::Selected { file, preview }
            }
            None => {
                info!("Selection cleared");
                ViewState::Unselected
            }
        };
    }

    /// Enable or disable metadata stripping.
    pub fn set_strip_metadata(&mut self, enabled: bool) {
        debug!(enabled, "Strip metadata changed");
        self.strip_metadata = enabled;
    }

    /// Set the expiry bucket.
    pub fn set_expiry(&mut self, expiry: Expiry) {
        debug!(%expiry, "Expiry changed");
        self.options.expires = expiry;
    }

    /// Set the download cap.
    pub fn set_max_downloads(&mut self, max_downloads: MaxDownloads) {
        debug!(%max_downloads, "Download cap changed");
        self.options.max_downloads = max_downloads;
    }

    /// A file is selected and no upload is in flight.
    pub fn can_upload(&self) -> bool {
        matches!(
            self.state,
            ViewState::Selected { .. } | ViewState::Done { .. } | ViewState::Error { .. }
        )
    }

    /// Sanitize (when enabled), upload, and render the QR code.
    ///
    /// Does nothing unless [`can_upload`](Self::can_upload). Ends in `Done` or
    /// in `Error` with the first failure; nothing is retried. If the returned
    /// future is dropped before it completes, the state goes back to
    /// `Selected` with the same file and preview.
    pub async fn upload(&mut self) -> &ViewState {
        if !self.can_upload() {
            debug!(phase = %self.phase(), "Upload not available");
            return &self.state;
        }

        let Some((file, preview)) = mem::take(&mut self.state).into_selection() else {
            return &self.state;
        };
        let pending = file.clone();
        self.state = ViewState::Uploading { file, preview };
        info!(
            phase = %Phase::Uploading,
            strip = self.strip_metadata,
            expires = %self.options.expires,
            max_downloads = %self.options.max_downloads,
            "Upload started"
        );

        let guard = InFlight::new(&mut self.state);
        let outcome = run_upload(
            &self.uploader,
            self.strip_metadata.then_some(self.sanitize),
            &self.options,
            self.qr_size,
            pending,
        )
        .await;
        guard.finish();

        let Some((file, preview)) = mem::take(&mut self.state).into_selection() else {
            return &self.state;
        };
        self.state = match outcome {
            Ok((result, qr)) => {
                info!(phase = %Phase::Done, link = %result.link, "Upload finished");
                ViewState::Done {
                    file,
                    preview,
                    result,
                    qr,
                }
            }
            Err(e) => {
                warn!(phase = %Phase::Error, code = %e.code, error = %e.message, "Upload failed");
                ViewState::Error {
                    file,
                    preview,
                    error: e.to_report(),
                }
            }
        };

        &self.state
    }

    /// Return to `Unselected`, revoking the preview. Options are kept.
    pub fn reset(&mut self) {
        self.release_preview();
        info!(phase = %Phase::Unselected, "Reset");
    }

    /// Revoke the live preview, if any, and leave the state `Unselected`.
    fn release_preview(&mut self) {
        if let Some((_, preview)) = mem::take(&mut self.state).into_selection() {
            self.previews.revoke(preview);
        }
    }
}

impl<U: Uploader, P: PreviewStore> Drop for ViewController<U, P> {
    fn drop(&mut self) {
        self.release_preview();
    }
}

/// Puts an `Uploading` state back to `Selected` unless finished.
struct InFlight<'a> {
    state: &'a mut ViewState,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a mut ViewState) -> Self {
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some((file, preview)) = mem::take(&mut *self.state).into_selection() {
            warn!(file = %file.name, "Upload abandoned, file still selected");
            *self.state = ViewState::Selected { file, preview };
        }
    }
}

/// Sanitize when a sanitizer is given, upload, and render the QR code.
async fn run_upload<U: Uploader>(
    uploader: &U,
    sanitize: Option<SanitizeFn>,
    options: &UploadOptions,
    qr_size: u32,
    file: LocalFile,
) -> Result<(UploadResult, QrBlock)> {
    let prepared = match sanitize {
        Some(sanitize) => sanitize_off_thread(sanitize, file).await?,
        None => file,
    };

    let result = uploader.upload(&prepared, options).await?;
    let qr = QrBlock::render_with_size(&result.link, qr_size)?;
    Ok((result, qr))
}

/// Run the sanitizer on the blocking pool; a panic there becomes an error.
async fn sanitize_off_thread(sanitize: SanitizeFn, file: LocalFile) -> Result<LocalFile> {
    let name = file.name.clone();
    match tokio::task::spawn_blocking(move || sanitize(&file)).await {
        Ok(Ok(clean)) => {
            debug!(from = %name, to = %clean.name, size = clean.size(), "Metadata stripped");
            Ok(clean)
        }
        Ok(Err(e)) => Err(Error::from(e).with_context(format!("Stripping metadata from {name}"))),
        Err(join) => Err(join_failure(join)),
    }
}

fn join_failure(join: JoinError) -> Error {
    if join.is_panic() {
        let message = panic_message(join.into_panic());
        Error::internal(format!("Image processing crashed: {message}"))
    } else {
        Error::internal("Image processing was cancelled")
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
