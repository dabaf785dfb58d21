//! Scan orchestrator for registry-driven scans.
//!
//! Every registry entry becomes one task. Tasks run with bounded parallelism,
//! share nothing mutable, and turn their own failures into a recorded error
//! with no postings. The per-company results are folded into a
//! [`ScanReport`] only after every task has settled.

use crate::error::{Result, ScanError};
use crate::filter::{company_matches, KeywordFilter};
use crate::search::{SearchProvider, SearchQuery};
use futures::stream::{FuturesUnordered, StreamExt};
use jobhunt_ats::BoardScraper;
use jobhunt_core::{Posting, PostingSource, SearchConfig};
use jobhunt_registry::{AggregatorCompany, AtsCompany, Registry};
use std::future::Future;
use std::sync::Arc;

/// Default size of the worker pool.
pub const DEFAULT_MAX_CONCURRENT_SCANS: usize = 10;

/// Result of scanning a single company.
#[derive(Debug, Clone)]
pub struct CompanyScanResult {
    /// Registry name of the company
    pub company: String,
    /// Postings that passed the filters
    pub postings: Vec<Posting>,
    /// Error message if the scan failed
    pub error: Option<String>,
}

impl CompanyScanResult {
    fn failed(company: &str, error: impl ToString) -> Self {
        Self {
            company: company.to_string(),
            postings: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Aggregate outcome of one scan mode.
///
/// Results are in task completion order; nothing downstream depends on it.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// One result per scanned company
    pub results: Vec<CompanyScanResult>,
}

impl ScanReport {
    /// All postings, concatenated. No de-duplication happens here.
    #[must_use]
    pub fn postings(&self) -> Vec<Posting> {
        self.results
            .iter()
            .flat_map(|result| result.postings.iter().cloned())
            .collect()
    }

    /// Consume the report into its postings.
    #[must_use]
    pub fn into_postings(self) -> Vec<Posting> {
        self.results
            .into_iter()
            .flat_map(|result| result.postings)
            .collect()
    }

    /// Results that recorded an error.
    pub fn failures(&self) -> impl Iterator<Item = &CompanyScanResult> {
        self.results.iter().filter(|result| result.error.is_some())
    }

    /// Append another report's results.
    pub fn extend(&mut self, other: ScanReport) {
        self.results.extend(other.results);
    }
}

/// Orchestrates ATS-direct and aggregator scans over a registry.
#[derive(Clone)]
pub struct ScanOrchestrator {
    /// Board fetcher for ATS entries
    scraper: BoardScraper,
    /// Search backend for aggregator entries
    search: Option<Arc<dyn SearchProvider>>,
    /// Maximum concurrent scans
    max_concurrent_scans: usize,
}

impl ScanOrchestrator {
    /// Create an orchestrator without a search provider.
    #[must_use]
    pub fn new(scraper: BoardScraper) -> Self {
        Self {
            scraper,
            search: None,
            max_concurrent_scans: DEFAULT_MAX_CONCURRENT_SCANS,
        }
    }

    /// Use `provider` for aggregator scans.
    #[must_use]
    pub fn with_search_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(provider);
        self
    }

    /// Set the maximum number of concurrent scans (at least one).
    #[must_use]
    pub fn with_max_concurrent_scans(mut self, max: usize) -> Self {
        self.max_concurrent_scans = max.max(1);
        self
    }

    /// Scrape every ATS entry's board.
    ///
    /// `filter`, when given, replaces each entry's own keywords.
    pub async fn scan_ats_companies(
        &self,
        registry: &Registry,
        filter: Option<&KeywordFilter>,
    ) -> ScanReport {
        let tasks = registry
            .ats_companies
            .iter()
            .map(|company| self.scan_ats_company(company, filter));

        let report = ScanReport {
            results: run_bounded(self.max_concurrent_scans, tasks).await,
        };
        log_report("ATS", &report);
        report
    }

    /// Search for every aggregator entry through the search provider.
    ///
    /// # Errors
    /// Returns [`ScanError::NoProvider`] if the registry has aggregator
    /// entries but no provider is configured. Individual search failures are
    /// recorded in the report instead.
    pub async fn scan_aggregator_companies(
        &self,
        registry: &Registry,
        defaults: &SearchConfig,
    ) -> Result<ScanReport> {
        if registry.aggregator_companies.is_empty() {
            return Ok(ScanReport::default());
        }
        let provider = self.search.as_ref().ok_or(ScanError::NoProvider)?;

        let tasks = registry
            .aggregator_companies
            .iter()
            .map(|company| scan_aggregator_company(&**provider, company, defaults));

        let report = ScanReport {
            results: run_bounded(self.max_concurrent_scans, tasks).await,
        };
        log_report("aggregator", &report);
        Ok(report)
    }

    async fn scan_ats_company(
        &self,
        company: &AtsCompany,
        filter: Option<&KeywordFilter>,
    ) -> CompanyScanResult {
        let postings = match self
            .scraper
            .try_fetch_postings(company.vendor, &company.name, &company.url)
            .await
        {
            Ok(postings) => postings,
            Err(e) => {
                tracing::warn!(company = %company.name, error = %e, "ATS scan failed");
                return CompanyScanResult::failed(&company.name, e);
            }
        };

        let own_filter;
        let filter = if let Some(filter) = filter {
            filter
        } else {
            own_filter = KeywordFilter::new(&company.keywords);
            &own_filter
        };

        let postings: Vec<Posting> = postings
            .into_iter()
            .filter(|posting| filter.matches(&posting.title))
            .collect();

        tracing::info!(company = %company.name, count = postings.len(), "scanned ATS board");
        CompanyScanResult {
            company: company.name.clone(),
            postings,
            error: None,
        }
    }
}

async fn scan_aggregator_company(
    provider: &dyn SearchProvider,
    company: &AggregatorCompany,
    defaults: &SearchConfig,
) -> CompanyScanResult {
    let mut query = SearchQuery::from_config(company.name.as_str(), defaults);
    if let Some(location) = &company.location {
        query = query.with_location(location.as_str());
    }

    let rows = match provider.search(&query).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(
                company = %company.name,
                provider = provider.provider_id(),
                error = %e,
                "aggregator search failed"
            );
            return CompanyScanResult::failed(&company.name, e);
        }
    };

    let keywords = KeywordFilter::new(&company.keywords);
    let postings: Vec<Posting> = rows
        .into_iter()
        .filter(|posting| company_matches(&posting.company, &company.name))
        .filter(|posting| keywords.matches(&posting.title))
        .map(|mut posting| {
            posting.source = PostingSource::AggregatorMonitor;
            posting.monitored_company = Some(company.name.clone());
            posting
        })
        .collect();

    tracing::info!(company = %company.name, count = postings.len(), "scanned aggregator");
    CompanyScanResult {
        company: company.name.clone(),
        postings,
        error: None,
    }
}

/// Drive `tasks` with at most `limit` in flight, collecting outputs in
/// completion order.
pub(crate) async fn run_bounded<I, F>(limit: usize, tasks: I) -> Vec<F::Output>
where
    I: IntoIterator<Item = F>,
    F: Future,
{
    let mut in_flight = FuturesUnordered::new();
    let mut results = Vec::new();

    for task in tasks {
        in_flight.push(task);

        // Respect concurrency limit
        while in_flight.len() >= limit.max(1) {
            if let Some(result) = in_flight.next().await {
                results.push(result);
            }
        }
    }

    while let Some(result) = in_flight.next().await {
        results.push(result);
    }

    results
}

fn log_report(mode: &str, report: &ScanReport) {
    let failed = report.failures().count();
    tracing::info!(
        mode,
        companies = report.results.len(),
        failed,
        postings = report.results.iter().map(|r| r.postings.len()).sum::<usize>(),
        "scan finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use jobhunt_core::AtsVendor;
    use jobhunt_http::stub::StubFetcher;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_run_bounded_limits_in_flight() {
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks = (0..20).map(|i| {
            let current = current.clone();
            let peak = peak.clone();
            async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                current.fetch_sub(1, Ordering::SeqCst);
                i
            }
        });

        let mut results = run_bounded(3, tasks).await;
        results.sort_unstable();
        assert_eq!(results, (0..20).collect::<Vec<_>>());
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    struct FailingProvider;

    #[async_trait]
    impl SearchProvider for FailingProvider {
        fn provider_id(&self) -> &str {
            "failing"
        }

        async fn search(&self, _query: &SearchQuery) -> Result<Vec<Posting>> {
            Err(ScanError::provider("failing", "offline"))
        }
    }

    #[tokio::test]
    async fn test_aggregator_failure_is_recorded() {
        let orchestrator = ScanOrchestrator::new(BoardScraper::new(Arc::new(StubFetcher::new())))
            .with_search_provider(Arc::new(FailingProvider));
        let mut registry = Registry::new();
        registry
            .add_aggregator(AggregatorCompany::new("Acme"))
            .expect("insert");

        let report = orchestrator
            .scan_aggregator_companies(&registry, &SearchConfig::default())
            .await
            .expect("scan");
        assert_eq!(report.failures().count(), 1);
        assert!(report.postings().is_empty());
    }

    #[tokio::test]
    async fn test_aggregator_scan_requires_provider() {
        let orchestrator = ScanOrchestrator::new(BoardScraper::new(Arc::new(StubFetcher::new())));
        let mut registry = Registry::new();

        let report = orchestrator
            .scan_aggregator_companies(&registry, &SearchConfig::default())
            .await
            .expect("empty registry needs no provider");
        assert!(report.results.is_empty());

        registry
            .add_aggregator(AggregatorCompany::new("Acme"))
            .expect("insert");
        assert!(matches!(
            orchestrator
                .scan_aggregator_companies(&registry, &SearchConfig::default())
                .await,
            Err(ScanError::NoProvider)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_board_recorded_as_failure() {
        let orchestrator = ScanOrchestrator::new(BoardScraper::new(Arc::new(StubFetcher::new())))
            .with_max_concurrent_scans(0);
        let mut registry = Registry::new();
        registry
            .add_ats(AtsCompany::new(
                "Down",
                "https://jobs.lever.co/down",
                AtsVendor::Lever,
            ))
            .expect("insert");

        let report = orchestrator.scan_ats_companies(&registry, None).await;
        assert_eq!(report.results.len(), 1);
        assert!(report.results[0].error.is_some());
        assert!(report.into_postings().is_empty());
    }
}
