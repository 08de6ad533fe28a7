//! The upload abstraction and its HTTP implementation.

use crate::client::HostClient;
use crate::config::UploaderConfig;
use crate::error::Result;
use crate::response::extract_link;
use async_trait::async_trait;
use photobeam_core::{Expiry, LocalFile, MaxDownloads, UploadOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Successful upload. Held in memory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// Shareable link, exactly as returned by the host
    pub link: String,
    /// Expiry the upload was requested with
    pub expiry: Expiry,
    /// Download cap the upload was requested with
    pub max_downloads: MaxDownloads,
}

/// Sends one file to a host and returns its share link.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload `file` with the given expiry and download cap.
    async fn upload(&self, file: &LocalFile, options: &UploadOptions) -> Result<UploadResult>;
}

#[async_trait]
impl<U: Uploader + ?Sized> Uploader for Arc<U> {
    async fn upload(&self, file: &LocalFile, options: &UploadOptions) -> Result<UploadResult> {
        (**self).upload(file, options).await
    }
}

#[async_trait]
impl<U: Uploader + ?Sized> Uploader for Box<U> {
    async fn upload(&self, file: &LocalFile, options: &UploadOptions) -> Result<UploadResult> {
        (**self).upload(file, options).await
    }
}

/// Multipart upload to the configured endpoint
#[derive(Clone)]
pub struct HttpUploader {
    client: HostClient,
}

impl HttpUploader {
    /// Create an uploader for the given configuration
    pub fn new(config: UploaderConfig) -> Result<Self> {
        Ok(Self {
            client: HostClient::new(config)?,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &UploaderConfig {
        self.client.config()
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    #[instrument(skip(self, file, options), fields(provider = %self.config().provider))]
    async fn upload(&self, file: &LocalFile, options: &UploadOptions) -> Result<UploadResult> {
        let body = self.client.post_file(file, options).await?;

        let link = extract_link(&body, &self.config().link_pointer).map_err(|e| {
            warn!(error = %e, "Host response unusable");
            e
        })?;

        info!(link = %link, "Upload complete");
        Ok(UploadResult {
            link,
            expiry: options.expires,
            max_downloads: options.max_downloads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{OptionsPlacement, Provider};
    use crate::error::UploadError;
    use mockito::Matcher;
    use std::time::Duration;

    fn photo() -> LocalFile {
        LocalFile::new("beach.jpg", "image/jpeg", b"fake-jpeg-bytes".to_vec())
    }

    fn options() -> UploadOptions {
        UploadOptions::new(Expiry::OneDay, MaxDownloads::Single)
    }

    fn uploader_for(server: &mockito::Server) -> HttpUploader {
        HttpUploader::new(UploaderConfig::default().with_endpoint(server.url())).unwrap()
    }

    #[tokio::test]
    async fn test_file_io_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("expires".into(), "24h".into()),
                Matcher::UrlEncoded("maxDownloads".into(), "1".into()),
            ]))
            .match_header("accept", "application/json")
            .match_body(Matcher::Regex(r#"name="file"; filename="beach.jpg""#.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"key":"abc123","link":"https://host/abc123"}"#)
            .create_async()
            .await;

        let uploader = uploader_for(&server);
        let result = uploader.upload(&photo(), &options()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.link, "https://host/abc123");
        assert_eq!(result.expiry, Expiry::OneDay);
        assert_eq!(result.max_downloads, MaxDownloads::Single);
    }

    #[tokio::test]
    async fn test_form_placement_and_nested_pointer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/upload")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="expires"\r\n\r\n7d"#.into()),
                Matcher::Regex(r#"name="maxDownloads"\r\n\r\n20"#.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"status":"success","data":{"url":"https://tmp/1/beach.jpg"}}"#)
            .create_async()
            .await;

        let config = UploaderConfig::for_provider(Provider::TmpFiles)
            .with_endpoint(format!("{}/api/v1/upload", server.url()))
            .with_placement(OptionsPlacement::Form);
        let uploader = HttpUploader::new(config).unwrap();
        let opts = UploadOptions::new(Expiry::OneWeek, MaxDownloads::Group);
        let result = uploader.upload(&photo(), &opts).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.link, "https://tmp/1/beach.jpg");
    }

    #[tokio::test]
    async fn test_success_without_link_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let uploader = uploader_for(&server);
        let err = uploader.upload(&photo(), &options()).await.unwrap_err();
        assert!(matches!(err, UploadError::MissingLink { ref pointer } if pointer == "/link"));
    }

    #[tokio::test]
    async fn test_non_json_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let uploader = uploader_for(&server);
        let err = uploader.upload(&photo(), &options()).await.unwrap_err();
        assert!(matches!(err, UploadError::NotJson { .. }));
    }

    #[tokio::test]
    async fn test_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(413)
            .with_body(r#"{"success":false,"message":"too big"}"#)
            .create_async()
            .await;

        let uploader = uploader_for(&server);
        let err = uploader.upload(&photo(), &options()).await.unwrap_err();
        assert!(matches!(err, UploadError::Status { status: 413, .. }));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = UploaderConfig::default().with_endpoint(format!("http://127.0.0.1:{port}/"));
        let uploader = HttpUploader::new(config).unwrap();
        let err = uploader.upload(&photo(), &options()).await.unwrap_err();
        assert!(matches!(err, UploadError::Request(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        // Accepted by the kernel backlog, never answered
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let config = UploaderConfig::default()
            .with_endpoint(format!("http://{addr}/"))
            .with_timeout(Duration::from_millis(300));
        let uploader = HttpUploader::new(config).unwrap();
        let err = uploader.upload(&photo(), &options()).await.unwrap_err();
        assert!(matches!(err, UploadError::Timeout(d) if d == Duration::from_millis(300)));
        drop(listener);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = HttpUploader::new(UploaderConfig::default().with_endpoint("file:///tmp"));
        assert!(matches!(result, Err(UploadError::Config(_))));
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = UploadResult {
            link: "https://host/abc123".into(),
            expiry: Expiry::OneDay,
            max_downloads: MaxDownloads::Single,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["maxDownloads"], 1);
        assert_eq!(json["expiry"], "24h");
    }
}
