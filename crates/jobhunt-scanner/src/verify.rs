//! Direct application link checks.
//!
//! Job boards often point at an employer link that has since expired. A
//! plain status check misses the common case where the employer redirects
//! to an error page with 200 OK, so the final URL is inspected as well.

use crate::orchestrator::DEFAULT_MAX_CONCURRENT_SCANS;
use futures::stream::{self, StreamExt};
use jobhunt_core::Posting;
use jobhunt_http::HttpFetcher;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default timeout for one link check.
pub const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Final-URL fragments that mark a soft 404.
pub const UNAVAILABLE_MARKERS: [&str; 5] =
    ["error", "expired", "notfound", "job-closed", "job_closed"];

/// Result of checking one posting's direct link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    /// The posting has no direct link
    MissingDirectLink,
    /// Redirected to what looks like an error or closed-job page
    Unavailable {
        /// URL after redirects
        final_url: String,
    },
    /// Answered 200 OK
    Ok {
        /// URL after redirects
        final_url: String,
    },
    /// Answered with another status
    Status {
        /// HTTP status code
        code: u16,
        /// URL after redirects
        final_url: String,
    },
    /// Request failed
    Error {
        /// URL that was requested
        url: String,
        /// Failure description
        reason: String,
    },
}

impl LinkStatus {
    /// URL to show for this posting, if any.
    #[must_use]
    pub fn url_to_use(&self) -> Option<&str> {
        match self {
            Self::MissingDirectLink => None,
            Self::Unavailable { final_url }
            | Self::Ok { final_url }
            | Self::Status { final_url, .. } => Some(final_url),
            Self::Error { url, .. } => Some(url),
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDirectLink => f.write_str("Missing Direct Link"),
            Self::Unavailable { .. } => f.write_str("Job Unavailable (Redirected)"),
            Self::Ok { .. } => f.write_str("200 OK"),
            Self::Status { code, .. } => write!(f, "Status {code}"),
            Self::Error { .. } => f.write_str("Error"),
        }
    }
}

/// Checks postings' direct application links.
#[derive(Clone)]
pub struct LinkVerifier {
    fetcher: Arc<dyn HttpFetcher>,
    timeout: Duration,
    max_concurrent: usize,
}

impl LinkVerifier {
    /// Create a verifier with the default timeout and pool size.
    #[must_use]
    pub fn new(fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self {
            fetcher,
            timeout: DEFAULT_VERIFY_TIMEOUT,
            max_concurrent: DEFAULT_MAX_CONCURRENT_SCANS,
        }
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of checks in flight.
    #[must_use]
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    /// Check every posting. The result at index `i` belongs to `postings[i]`.
    pub async fn verify_all(&self, postings: &[Posting]) -> Vec<LinkStatus> {
        let statuses: Vec<LinkStatus> = stream::iter(postings)
            .map(|posting| self.verify(posting))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let reachable = statuses
            .iter()
            .filter(|status| matches!(status, LinkStatus::Ok { .. }))
            .count();
        tracing::info!(checked = statuses.len(), reachable, "verified direct links");
        statuses
    }

    /// Check one posting's direct link.
    pub async fn verify(&self, posting: &Posting) -> LinkStatus {
        let Some(url) = posting
            .direct_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        else {
            return LinkStatus::MissingDirectLink;
        };

        match self.fetcher.get(url, self.timeout).await {
            Ok(response) => {
                let final_url = response.final_url;
                let lowered = final_url.to_lowercase();
                if UNAVAILABLE_MARKERS
                    .iter()
                    .any(|marker| lowered.contains(marker))
                {
                    LinkStatus::Unavailable { final_url }
                } else if response.status == 200 {
                    LinkStatus::Ok { final_url }
                } else {
                    LinkStatus::Status {
                        code: response.status,
                        final_url,
                    }
                }
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "direct link check failed");
                LinkStatus::Error {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}
