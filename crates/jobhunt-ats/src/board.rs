//! Fetch-and-parse for ATS boards.

use crate::error::BoardError;
use crate::{greenhouse, lever};
use jobhunt_core::{AtsVendor, Posting};
use jobhunt_http::HttpFetcher;
use std::sync::Arc;
use std::time::Duration;

/// Default timeout for full board fetches.
pub const DEFAULT_BOARD_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches ATS board pages and dispatches them to the vendor parser.
#[derive(Clone)]
pub struct BoardScraper {
    fetcher: Arc<dyn HttpFetcher>,
    timeout: Duration,
}

impl BoardScraper {
    /// Create a scraper using the default board timeout.
    #[must_use]
    pub fn new(fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self {
            fetcher,
            timeout: DEFAULT_BOARD_TIMEOUT,
        }
    }

    /// Override the board fetch timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch a board and parse its postings.
    ///
    /// # Errors
    /// Returns error on transport failure or a non-200 answer. An empty
    /// board is `Ok(vec![])`.
    pub async fn try_fetch_postings(
        &self,
        vendor: AtsVendor,
        company: &str,
        board_url: &str,
    ) -> Result<Vec<Posting>, BoardError> {
        let page = self.fetcher.get(board_url, self.timeout).await?;
        if !page.is_ok() {
            return Err(BoardError::Status {
                url: board_url.to_string(),
                status: page.status,
            });
        }

        let postings = match vendor {
            AtsVendor::Greenhouse => greenhouse::parse_board(&page.body, company),
            AtsVendor::Lever => lever::parse_board(&page.body, company, board_url),
        };

        tracing::debug!(
            company,
            vendor = %vendor,
            count = postings.len(),
            "parsed board"
        );

        Ok(postings)
    }

    /// Fetch a board and parse its postings, degrading any failure to an
    /// empty list.
    pub async fn fetch_postings(
        &self,
        vendor: AtsVendor,
        company: &str,
        board_url: &str,
    ) -> Vec<Posting> {
        match self.try_fetch_postings(vendor, company, board_url).await {
            Ok(postings) => postings,
            Err(e) => {
                tracing::warn!(company, url = board_url, error = %e, "board fetch failed");
                Vec::new()
            }
        }
    }
}
