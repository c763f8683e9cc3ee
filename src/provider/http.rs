//! HTTP transport for API requests
//!
//! The orchestrator talks to the network only through [`HttpFetcher`], so
//! tests can script responses without a server.

use crate::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;

/// Status and body of a completed HTTP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async GET transport
///
/// Implementations must resolve with `Err(FetchError::Timeout)` when the
/// request does not complete within `timeout`, and must return non-2xx
/// responses as `Ok` so the caller can inspect the status.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Perform a GET request
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError>;
}

/// [`HttpFetcher`] backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Create a fetcher that sends the given user agent
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Http(e.to_string())
            }
        };

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_err)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_err)?;

        Ok(HttpResponse { status, body })
    }
}
