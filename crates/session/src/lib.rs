//! The PhotoBeam view controller.
//!
//! One flow: pick a photo, optionally strip its metadata, upload it with an
//! expiry and download cap, then show the link and a QR code. The current
//! phase and the data legal in it live in a single [`ViewState`] value that is
//! replaced on every transition.
//!
//! # Example
//!
//! ```rust,no_run
//! use photobeam_core::LocalFile;
//! use photobeam_session::{TempPreviewStore, ViewController};
//! use photobeam_uploader::{HttpUploader, UploaderConfig};
//!
//! # async fn run() -> photobeam_core::Result<()> {
//! let uploader = HttpUploader::new(UploaderConfig::default())?;
//! let mut controller = ViewController::new(uploader, TempPreviewStore::new()?);
//!
//! controller.select_file(Some(LocalFile::read("holiday.jpg")?));
//! controller.upload().await;
//! if let Some(link) = controller.state().link() {
//!     println!("{link}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod controller;
pub mod preview;
mod state;

pub use controller::{SanitizeFn, ViewController};
pub use preview::{PreviewHandle, PreviewStore, TempPreviewStore, THUMBNAIL_EDGE};
pub use state::{Phase, ViewState};
