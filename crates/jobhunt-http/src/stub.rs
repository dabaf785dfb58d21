//! Canned-response fetcher for offline tests.
//!
//! Responses are keyed by exact request URL. Unknown URLs fail with a
//! transport error, the same way an unreachable host would.

use crate::client::{FetchResponse, HttpFetcher};
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Canned {
    Response(FetchResponse),
    Failure(FetchError),
}

/// A recorded request: method and URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubRequest {
    /// `"GET"` or `"HEAD"`
    pub method: &'static str,
    /// Requested URL
    pub url: String,
    /// Timeout the caller asked for
    pub timeout: Duration,
}

/// [`HttpFetcher`] serving pre-registered responses.
#[derive(Debug, Default)]
pub struct StubFetcher {
    canned: HashMap<String, Canned>,
    requests: Mutex<Vec<StubRequest>>,
}

impl StubFetcher {
    /// Create a fetcher with no registered URLs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve an HTML page with the given status at `url`.
    #[must_use]
    pub fn with_page(self, url: &str, status: u16, body: &str) -> Self {
        self.with_response(
            url,
            FetchResponse {
                status,
                final_url: url.to_string(),
                content_type: Some("text/html; charset=utf-8".to_string()),
                body: body.to_string(),
            },
        )
    }

    /// Serve an arbitrary response at `url`.
    #[must_use]
    pub fn with_response(mut self, url: &str, response: FetchResponse) -> Self {
        self.canned
            .insert(url.to_string(), Canned::Response(response));
        self
    }

    /// Make requests to `url` time out.
    #[must_use]
    pub fn with_timeout(mut self, url: &str) -> Self {
        self.canned.insert(
            url.to_string(),
            Canned::Failure(FetchError::Timeout(url.to_string())),
        );
        self
    }

    /// Every request seen so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<StubRequest> {
        self.requests.lock().expect("acquire request log").clone()
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    fn serve(&self, method: &'static str, url: &str, timeout: Duration) -> Result<FetchResponse> {
        self.requests
            .lock()
            .expect("acquire request log")
            .push(StubRequest {
                method,
                url: url.to_string(),
                timeout,
            });

        match self.canned.get(url) {
            Some(Canned::Response(response)) => {
                let mut response = response.clone();
                if method == "HEAD" {
                    response.body.clear();
                }
                Ok(response)
            }
            Some(Canned::Failure(err)) => Err(err.clone()),
            None => Err(FetchError::Transport {
                url: url.to_string(),
                reason: "no stubbed response".to_string(),
            }),
        }
    }
}

#[async_trait]
impl HttpFetcher for StubFetcher {
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchResponse> {
        self.serve("GET", url, timeout)
    }

    async fn head(&self, url: &str, timeout: Duration) -> Result<FetchResponse> {
        self.serve("HEAD", url, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_registered_page() {
        let fetcher = StubFetcher::new().with_page("https://example.com", 200, "<p>hi</p>");
        let page = fetcher
            .get("https://example.com", Duration::from_secs(1))
            .await
            .expect("stubbed page");
        assert!(page.is_ok());
        assert!(page.is_html());
        assert_eq!(page.body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_head_drops_body_and_logs_method() {
        let fetcher = StubFetcher::new().with_page("https://example.com", 200, "<p>hi</p>");
        let page = fetcher
            .head("https://example.com", Duration::from_secs(2))
            .await
            .expect("stubbed page");
        assert!(page.body.is_empty());

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "HEAD");
        assert_eq!(requests[0].timeout, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_unknown_and_failing_urls() {
        let fetcher = StubFetcher::new().with_timeout("https://slow.example.com");

        let slow = fetcher
            .get("https://slow.example.com", Duration::from_secs(1))
            .await;
        assert!(matches!(slow, Err(FetchError::Timeout(_))));

        let unknown = fetcher
            .get("https://unknown.example.com", Duration::from_secs(1))
            .await;
        assert!(matches!(unknown, Err(FetchError::Transport { .. })));
    }
}
