//! HTTP client wrapper for fetching emoji images.
//!
//! This module provides the `HttpClient` struct which owns the shared
//! connection pool and turns request failures into [`DownloadError`]s.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::{debug, instrument};
use url::Url;

use super::constants::CONNECT_TIMEOUT_SECS;
use super::error::DownloadError;
use crate::user_agent;

/// HTTP client for emoji downloads.
///
/// Created once per run and cloned into every worker; clones share one
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use emoji_backup_core::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let bytes = client.fetch_bytes("https://emoji.slack-edge.com/T0/party/1.gif").await?;
/// println!("{} bytes", bytes.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with the default connect timeout.
    ///
    /// No overall request timeout is set: a slow transfer only ever holds
    /// up the worker that owns it.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_connect_timeout(Some(Duration::from_secs(CONNECT_TIMEOUT_SECS)))
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a new HTTP client with an explicit connect timeout
    /// (`None` disables it).
    ///
    /// # Errors
    ///
    /// Returns the builder error if the TLS backend cannot be initialised.
    pub fn with_connect_timeout(connect_timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let client = base_client_builder(connect_timeout).build()?;
        Ok(Self { client })
    }

    /// Fetches the full body of `url` into memory.
    ///
    /// The body is treated as opaque bytes; no content-type check is made.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, connect timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - Reading the body fails
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let parsed_url = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self.client.get(parsed_url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::network(url, e))?;
        debug!(bytes = body.len(), "fetched body");
        Ok(body.to_vec())
    }

    /// Returns the underlying reqwest client (shares the connection pool).
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

fn base_client_builder(connect_timeout: Option<Duration>) -> ClientBuilder {
    let mut builder = Client::builder()
        .gzip(true)
        .user_agent(user_agent::default_user_agent());
    if let Some(timeout) = connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    builder
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_bytes_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/party.gif"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"GIF89a".to_vec()))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let body = client
            .fetch_bytes(&format!("{}/party.gif", server.uri()))
            .await
            .unwrap();

        assert_eq!(body, b"GIF89a");
    }

    #[tokio::test]
    async fn test_fetch_bytes_404_is_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let result = client
            .fetch_bytes(&format!("{}/gone.png", server.uri()))
            .await;

        assert!(
            matches!(result, Err(DownloadError::HttpStatus { status: 404, .. })),
            "got {result:?}"
        );
    }

    #[tokio::test]
    async fn test_fetch_bytes_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header_regex("user-agent", "^emoji-backup/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new();
        client
            .fetch_bytes(&format!("{}/a.png", server.uri()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_fetch_bytes_invalid_url() {
        let client = HttpClient::new();
        let result = client.fetch_bytes("not-a-valid-url").await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[test]
    fn test_client_without_connect_timeout_builds() {
        assert!(HttpClient::with_connect_timeout(None).is_ok());
    }
}
