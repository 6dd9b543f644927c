//! HTTP transport with tracing and domain allowlist.
//!
//! The prober talks to the network only through [`HttpTransport`], so tests
//! and embedders can substitute their own implementation. [`HttpClient`] is
//! the reqwest-backed default:
//! - Per-request timeout
//! - Domain allowlist checked before any request leaves the process
//! - Request tracing that never records query strings (they carry the key)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent string for promptprobe.
const USER_AGENT: &str = concat!("promptprobe/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Transport Trait
// ============================================================================

/// Status code and body text of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The HTTP operations the prober needs.
///
/// Implementations must be safe to share between concurrent probes.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POSTs a JSON body and returns the status and body text.
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<TransportResponse, HttpError>;

    /// GETs a URL and returns the status and body text.
    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportResponse, HttpError>;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// reqwest-backed [`HttpTransport`] with a domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a new HTTP client with a custom default timeout.
    ///
    /// Individual requests still pass their own timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: client,
            allowed_domains: None,
        })
    }

    /// Restricts requests to the given domains and their subdomains.
    ///
    /// An empty list removes the restriction.
    #[must_use]
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = if domains.is_empty() { None } else { Some(domains) };
        self
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), HttpError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(()); // No restrictions
        };

        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(HttpError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Sends a prepared request and reads the body.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<TransportResponse, HttpError> {
        // reqwest errors embed the request URL, and the URL carries the key.
        let response = request.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(timeout)
            } else {
                HttpError::Request(e.without_url())
            }
        })?;

        let status = response.status().as_u16();
        debug!(status, "Response received");

        let body = response
            .text()
            .await
            .map_err(|e| HttpError::Request(e.without_url()))?;
        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    #[instrument(skip_all, fields(url = %loggable_url(url)))]
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<TransportResponse, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("POST request with JSON");

        self.send(self.inner.post(url).json(body), timeout).await
    }

    #[instrument(skip_all, fields(url = %loggable_url(url)))]
    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportResponse, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("GET request");

        self.send(self.inner.get(url), timeout).await
    }
}

/// Returns the URL without its query string, which may carry credentials.
pub fn loggable_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.to_string()
        }
        Err(_) => "<invalid url>".to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
