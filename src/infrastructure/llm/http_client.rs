use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::io::ReaderStream;

/// Failures talking to the model runtime over HTTP
#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl HttpClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, HttpClientError>;

    /// Stream a file as the raw request body; the response body is ignored
    async fn post_file(&self, url: &str, path: &Path) -> Result<(), HttpClientError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Client with a wall-clock limit on every request
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpClientError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, HttpClientError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| HttpClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| HttpClientError::Decode(e.to_string()))
    }

    async fn post_file(&self, url: &str, path: &Path) -> Result<(), HttpClientError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| HttpClientError::Transport(format!("Failed to open {}: {}", path.display(), e)))?;
        let length = file
            .metadata()
            .await
            .map_err(|e| HttpClientError::Transport(format!("Failed to read {}: {}", path.display(), e)))?
            .len();

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_LENGTH, length)
            .body(body)
            .send()
            .await
            .map_err(|e| HttpClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
