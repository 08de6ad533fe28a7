//! Terminal output for the PhotoBeam command line
//!
//! Provides shared CLI functionality:
//! - Text or JSON output selection
//! - Status messages and error reports
//! - Spinners for network waits

#![warn(missing_docs)]

pub mod output;
pub mod progress;

pub use output::{OutputFormat, Status};
