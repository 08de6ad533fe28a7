//! HTTP client for file hosts

use crate::config::UploaderConfig;
use crate::error::{Result, UploadError};
use crate::providers::OptionsPlacement;
use photobeam_core::{LocalFile, UploadOptions};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Multipart field carrying the file
const FILE_FIELD: &str = "file";

const CLIENT_USER_AGENT: &str = concat!("photobeam/", env!("CARGO_PKG_VERSION"));

/// Anonymous multipart client for one configured host.
///
/// Sends `Accept: application/json` and a request ID; no credentials.
#[derive(Clone)]
pub struct HostClient {
    inner: Client,
    config: Arc<UploaderConfig>,
}

impl HostClient {
    /// Create a client; the configuration is validated first
    pub fn new(config: UploaderConfig) -> Result<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(UploadError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// POST the file as multipart and return the parsed JSON body.
    ///
    /// Fails on transport errors, timeout, non-2xx status and non-JSON bodies.
    #[instrument(skip(self, file, options), fields(file = %file.name, size = file.size(), request_id))]
    pub async fn post_file(&self, file: &LocalFile, options: &UploadOptions) -> Result<Value> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", &request_id.as_str());

        let mut form = Form::new().part(FILE_FIELD, file_part(file));
        let mut request = self
            .inner
            .post(&self.config.endpoint)
            .header(X_REQUEST_ID, &request_id);

        match self.config.placement {
            OptionsPlacement::Query => request = request.query(&options.as_params()),
            OptionsPlacement::Form => {
                for (name, value) in options.as_params() {
                    form = form.text(name, value);
                }
            }
            OptionsPlacement::Omit => {}
        }

        debug!(
            endpoint = %self.config.endpoint,
            placement = ?self.config.placement,
            expires = %options.expires,
            max_downloads = %options.max_downloads,
            "Sending upload"
        );

        let start = Instant::now();
        let response = request
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let result = self.handle_response(response).await;
        debug!(elapsed_ms = start.elapsed().as_millis(), ok = result.is_ok(), "Upload finished");
        result
    }

    /// Check the status and parse the body as JSON
    async fn handle_response(&self, response: Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Host returned an error status");
            return Err(UploadError::status(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|_| UploadError::not_json(&body))
    }

    fn transport_error(&self, err: reqwest::Error) -> UploadError {
        if err.is_timeout() {
            UploadError::Timeout(self.config.timeout)
        } else {
            UploadError::Request(err)
        }
    }
}

/// File part named `file`, carrying the file name and media type
fn file_part(file: &LocalFile) -> Part {
    let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
    match part.mime_str(&file.media_type) {
        Ok(part) => part,
        Err(_) => {
            warn!(media_type = %file.media_type, "Unusable media type, sending without one");
            Part::bytes(file.bytes.clone()).file_name(file.name.clone())
        }
    }
}
