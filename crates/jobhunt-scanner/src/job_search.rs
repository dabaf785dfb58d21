//! Multi-term generic job search.

use crate::orchestrator::DEFAULT_MAX_CONCURRENT_SCANS;
use crate::search::{SearchProvider, SearchQuery};
use futures::stream::{self, StreamExt};
use jobhunt_core::{JobType, Posting, SearchConfig};
use std::collections::HashSet;
use std::sync::Arc;

/// A query that failed; the rest of the run carried on without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFailure {
    /// Search term of the failed query
    pub term: String,
    /// Job type of the failed query, if one was set
    pub job_type: Option<JobType>,
    /// Error message
    pub error: String,
}

/// Outcome of a [`JobSearch::run`].
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Postings from every successful query, de-duplicated on `job_url`
    pub postings: Vec<Posting>,
    /// Queries that failed
    pub failures: Vec<SearchFailure>,
}

/// Runs one provider query per (term, job type) pair and merges the results.
pub struct JobSearch {
    provider: Arc<dyn SearchProvider>,
    config: SearchConfig,
    max_concurrent: usize,
}

impl JobSearch {
    /// Search through `provider` with `config` supplying the query defaults
    /// and job types.
    #[must_use]
    pub fn new(provider: Arc<dyn SearchProvider>, config: SearchConfig) -> Self {
        Self {
            provider,
            config,
            max_concurrent: DEFAULT_MAX_CONCURRENT_SCANS,
        }
    }

    /// Set the maximum number of queries in flight.
    #[must_use]
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    /// The queries a run over `terms` would issue, in order.
    #[must_use]
    pub fn queries(&self, terms: &str) -> Vec<SearchQuery> {
        let job_types: Vec<Option<JobType>> = if self.config.job_types.is_empty() {
            vec![None]
        } else {
            self.config.job_types.iter().copied().map(Some).collect()
        };

        split_terms(terms)
            .into_iter()
            .flat_map(|term| {
                job_types.iter().map(move |job_type| {
                    SearchQuery::from_config(term.clone(), &self.config).with_job_type(*job_type)
                })
            })
            .collect()
    }

    /// Search every comma-separated term.
    ///
    /// Queries run concurrently but results are folded in query order, so
    /// the first occurrence of a duplicated `job_url` is always the one from
    /// the earliest query.
    pub async fn run(&self, terms: &str) -> SearchOutcome {
        let queries = self.queries(terms);
        let provider = &self.provider;

        let answers: Vec<_> = stream::iter(queries)
            .map(|query| async move {
                let result = provider.search(&query).await;
                (query, result)
            })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut outcome = SearchOutcome::default();
        let mut combined = Vec::new();
        for (query, result) in answers {
            match result {
                Ok(postings) => {
                    tracing::debug!(
                        term = %query.search_term,
                        job_type = ?query.job_type,
                        count = postings.len(),
                        "search query finished"
                    );
                    combined.extend(postings);
                }
                Err(e) => {
                    tracing::warn!(
                        term = %query.search_term,
                        job_type = ?query.job_type,
                        error = %e,
                        "search query failed"
                    );
                    outcome.failures.push(SearchFailure {
                        term: query.search_term,
                        job_type: query.job_type,
                        error: e.to_string(),
                    });
                }
            }
        }

        outcome.postings = dedup_by_job_url(combined);
        tracing::info!(
            postings = outcome.postings.len(),
            failed = outcome.failures.len(),
            "job search finished"
        );
        outcome
    }
}

/// Split comma-separated search terms, dropping blanks.
///
/// With no usable term left, a single empty term is returned so the
/// provider still runs one unrestricted query.
#[must_use]
pub fn split_terms(input: &str) -> Vec<String> {
    let terms: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(ToString::to_string)
        .collect();

    if terms.is_empty() {
        vec![String::new()]
    } else {
        terms
    }
}

/// Drop postings whose `job_url` was already seen, keeping the first.
#[must_use]
pub fn dedup_by_job_url(postings: Vec<Posting>) -> Vec<Posting> {
    let mut seen = HashSet::new();
    postings
        .into_iter()
        .filter(|posting| seen.insert(posting.job_url.clone()))
        .collect()
}
