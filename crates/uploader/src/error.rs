//! Error types for the uploader

use photobeam_core::ErrorCode;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for upload operations
pub type Result<T> = std::result::Result<T, UploadError>;

/// Longest response excerpt kept in an error message
const BODY_EXCERPT_LEN: usize = 200;

/// Upload failures. Each one ends the attempt; nothing is retried.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Transport failure (DNS, connection, TLS, ...)
    #[error("Network error: {0}")]
    Request(#[from] reqwest::Error),

    /// No response within the client-side timeout
    #[error("Upload timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Host answered with a non-2xx status
    #[error("Host returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body excerpt
        message: String,
    },

    /// 2xx response whose body is not JSON
    #[error("Host response is not JSON: {excerpt}")]
    NotJson {
        /// Response body excerpt
        excerpt: String,
    },

    /// JSON response without a usable link
    #[error("Host response has no link at `{pointer}`")]
    MissingLink {
        /// JSON pointer that was looked up
        pointer: String,
    },

    /// Host reported the upload as unsuccessful
    #[error("Host rejected the upload: {0}")]
    Rejected(String),

    /// Invalid uploader configuration
    #[error("Uploader configuration error: {0}")]
    Config(String),
}

impl UploadError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a status error, keeping only the start of the body
    pub fn status(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            "empty response".to_string()
        } else {
            excerpt(body)
        };
        Self::Status { status, message }
    }

    /// Create a not-JSON error, keeping only the start of the body
    pub fn not_json(body: &str) -> Self {
        Self::NotJson {
            excerpt: excerpt(body),
        }
    }

    /// Error code used when reporting this failure
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Request(_) => ErrorCode::NetworkError,
            Self::Timeout(_) => ErrorCode::UploadTimeout,
            Self::Status { .. } => ErrorCode::BadStatus,
            Self::NotJson { .. } => ErrorCode::MalformedResponse,
            Self::MissingLink { .. } => ErrorCode::MissingLink,
            Self::Rejected(_) => ErrorCode::UploadError,
            Self::Config(_) => ErrorCode::InvalidConfigValue,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 500)
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Request(_) => Some("Check your internet connection and try again"),
            Self::Timeout(_) => Some("Try again on a faster connection or raise --timeout"),
            Self::Status { status: 413, .. } => Some("The file is too large for this host"),
            Self::Status { status: 429, .. } => Some("The host is rate limiting; wait a moment"),
            Self::NotJson { .. } | Self::MissingLink { .. } => {
                Some("Check the endpoint and link_pointer settings")
            }
            Self::Config(_) => Some("Run `photobeam config` to see the effective settings"),
            _ => None,
        }
    }
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

impl From<UploadError> for photobeam_core::Error {
    fn from(err: UploadError) -> Self {
        let mut error = photobeam_core::Error::upload(err.code(), err.to_string());
        if let Some(suggestion) = err.suggestion() {
            error = error.with_suggestion(suggestion);
        }
        error.with_source(err)
    }
}
