//! HTTP transport with a cookie jar and browser-like headers.
//!
//! The transport performs exactly one exchange per call. It does not retry
//! and does not interpret status codes; that is the gateway's job.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header, header::HeaderMap, header::HeaderValue};
use tracing::{debug, instrument};
use url::Url;

use crate::error::FetchError;
use crate::request::{FetchRequest, Method, RawDocument};

/// Browser user agent; the portal serves reduced pages to unknown agents.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

// ============================================================================
// Transport Trait
// ============================================================================

/// One HTTP exchange against the remote portal.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes a request and returns the response, whatever its status.
    ///
    /// Errors are reserved for exchanges that did not complete.
    async fn execute(&self, request: &FetchRequest) -> Result<RawDocument, FetchError>;

    /// Drops session cookies so the next request starts a fresh session.
    fn reset(&self) -> Result<(), FetchError>;
}

// ============================================================================
// Reqwest Transport
// ============================================================================

/// Transport backed by a reqwest client with a cookie store.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: Mutex<Client>,
    base_url: Url,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport for a base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)?;
        let client = build_client(timeout)?;
        Ok(Self {
            client: Mutex::new(client),
            base_url,
            timeout,
        })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn client(&self) -> Result<Client, FetchError> {
        self.client
            .lock()
            .map(|c| c.clone())
            .map_err(|_| FetchError::Unexpected("HTTP client lock poisoned".to_string()))
    }
}

fn build_client(timeout: Duration) -> Result<Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .cookie_store(true)
        .gzip(true)
        .build()
        .map_err(|e| FetchError::Unexpected(format!("Failed to create HTTP client: {e}")))
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(path = %request.path))]
    async fn execute(&self, request: &FetchRequest) -> Result<RawDocument, FetchError> {
        let url = request.url(&self.base_url)?;
        let client = self.client()?;

        let builder = match request.method {
            Method::Get => client.get(url),
            Method::Post => client.post(url).form(&request.form),
        };

        debug!(method = ?request.method, "Sending request");
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "Response received");

        Ok(RawDocument::new(status, final_url, body))
    }

    fn reset(&self) -> Result<(), FetchError> {
        let fresh = build_client(self.timeout)?;
        let mut guard = self
            .client
            .lock()
            .map_err(|_| FetchError::Unexpected("HTTP client lock poisoned".to_string()))?;
        *guard = fresh;
        debug!("Session cookies dropped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = ReqwestTransport::new("not a url", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, FetchError::InvalidRequest(_)));
    }

    #[test]
    fn test_reset_keeps_base_url() {
        let transport =
            ReqwestTransport::new("https://www.equasis.org", Duration::from_secs(5)).unwrap();
        transport.reset().unwrap();
        assert_eq!(transport.base_url().as_str(), "https://www.equasis.org/");
    }
}
