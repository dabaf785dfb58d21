//! The fetch interface and its reqwest implementation.

use crate::error::{FetchError, Result};
use crate::throttle::HostThrottle;
use async_trait::async_trait;
use jobhunt_core::ScanningConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use std::time::Duration;
use url::Url;

/// Maximum redirects followed for any request.
const MAX_REDIRECTS: usize = 10;

/// Outcome of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// URL after following redirects
    pub final_url: String,
    /// `Content-Type` header, if present
    pub content_type: Option<String>,
    /// Response body (empty for HEAD requests)
    pub body: String,
}

impl FetchResponse {
    /// Whether the server answered 200 OK.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Whether the response declares an HTML body.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"))
    }
}

/// HTTP access used by scrapers, resolvers and link verification.
///
/// Implementations must be thread-safe (Send + Sync); one fetcher is shared
/// by every task of a scan.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Issue a GET and read the body.
    ///
    /// # Errors
    /// Returns error on timeout or transport failure. Non-200 statuses are
    /// returned as responses.
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchResponse>;

    /// Issue a HEAD request, following redirects.
    ///
    /// # Errors
    /// Returns error on timeout or transport failure.
    async fn head(&self, url: &str, timeout: Duration) -> Result<FetchResponse>;
}

/// Production fetcher backed by a shared [`reqwest::Client`].
pub struct ReqwestFetcher {
    client: Client,
    throttle: HostThrottle,
}

impl ReqwestFetcher {
    /// Build a fetcher with the configured header set and host spacing.
    ///
    /// # Errors
    /// Returns error if a header value is invalid or the client cannot be built.
    pub fn new(config: &ScanningConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value("user_agent", &config.user_agent)?);
        headers.insert(ACCEPT, header_value("accept", &config.accept)?);
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value("accept_language", &config.accept_language)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| FetchError::Client(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            throttle: HostThrottle::new(config.min_host_delay()),
        })
    }

    async fn send(&self, method: Method, url: &str, timeout: Duration) -> Result<FetchResponse> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        if let Some(host) = parsed.host_str() {
            self.throttle.acquire(host).await;
        }

        let read_body = method == Method::GET;
        let response = self
            .client
            .request(method, parsed)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        let body = if read_body {
            response
                .text()
                .await
                .map_err(|e| FetchError::from_reqwest(url, &e))?
        } else {
            String::new()
        };

        tracing::trace!(url, status, final_url = %final_url, "fetched");

        Ok(FetchResponse {
            status,
            final_url,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchResponse> {
        self.send(Method::GET, url, timeout).await
    }

    async fn head(&self, url: &str, timeout: Duration) -> Result<FetchResponse> {
        self.send(Method::HEAD, url, timeout).await
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| FetchError::Client(format!("invalid {field} header: {e}")))
}
