//! ATS discovery through site-restricted web search.
//!
//! Postings hosted on ATS boards are often missing from job sites but
//! indexed by general web search. Each ATS host is searched with
//! `site:<host> "<keyword>"`, one search at a time with a random pause in
//! between. Hits on the vendor domains become [`PostingSource::AtsDiscovery`]
//! postings whose links can be fed to the registry merge engine.

use crate::error::{Result, ScanError};
use crate::search::run_bridge;
use async_trait::async_trait;
use jobhunt_ats::resolver::RESERVED_GREENHOUSE_TOKENS;
use jobhunt_core::{naming, DiscoveryConfig, Posting, PostingSource};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Hosts searched, in order, with the domain a hit must be on.
pub const DISCOVERY_HOSTS: [(&str, &str); 3] = [
    ("boards.greenhouse.io", "greenhouse.io"),
    ("jobs.lever.co", "lever.co"),
    ("jobs.ashbyhq.com", "ashbyhq.com"),
];

/// Company name used when a hit's URL carries no board token.
pub const UNKNOWN_COMPANY: &str = "Unknown";

/// Location placeholder; search snippets do not carry one reliably.
pub const UNLISTED_LOCATION: &str = "Check Listing";

/// One web search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebHit {
    /// Result link
    pub url: String,
    /// Result title
    pub title: String,
    /// Result snippet
    pub description: String,
}

/// A general web search backend.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Short identifier used in logs and errors.
    fn engine_id(&self) -> &str;

    /// Run one query, returning at most `max_results` hits.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<WebHit>>;
}

#[derive(Serialize)]
struct WebQuery<'a> {
    query: &'a str,
    num_results: u32,
}

/// Runs an external program per web search.
///
/// The program receives `{"query": ..., "num_results": ...}` on stdin and
/// must print a JSON array of [`WebHit`]s.
#[derive(Debug, Clone)]
pub struct CommandWebSearch {
    program: String,
    args: Vec<String>,
}

impl CommandWebSearch {
    /// Engine for an argv; `None` if it is empty.
    #[must_use]
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Engine for the configured `discovery.command`, if any.
    #[must_use]
    pub fn from_config(config: &DiscoveryConfig) -> Option<Self> {
        Self::from_argv(&config.command)
    }

    fn output_error(&self, source: serde_json::Error) -> ScanError {
        ScanError::ProviderOutput {
            provider: self.program.clone(),
            source,
        }
    }
}

#[async_trait]
impl WebSearch for CommandWebSearch {
    fn engine_id(&self) -> &str {
        &self.program
    }

    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<WebHit>> {
        let input = serde_json::to_vec(&WebQuery {
            query,
            num_results: max_results,
        })
        .map_err(|e| self.output_error(e))?;

        let stdout = run_bridge(&self.program, &self.args, &input).await?;
        serde_json::from_slice(&stdout).map_err(|e| self.output_error(e))
    }
}

/// The query for one ATS host.
#[must_use]
pub fn site_query(host: &str, keyword: &str) -> String {
    format!("site:{host} \"{}\"", keyword.trim())
}

/// Turn a hit on an ATS domain into a posting; other hits yield `None`.
///
/// The company is the board token (first path segment) capitalized, or
/// [`UNKNOWN_COMPANY`] when the link has none.
#[must_use]
pub fn hit_to_posting(hit: &WebHit) -> Option<Posting> {
    let link = hit.url.trim();
    let url = Url::parse(link).ok()?;
    let host = url.host_str()?;
    if !DISCOVERY_HOSTS
        .iter()
        .any(|(_, domain)| naming::host_on_domain(host, domain))
    {
        return None;
    }

    let company = url
        .path_segments()
        .and_then(|mut segments| segments.find(|s| !s.is_empty()))
        .filter(|token| {
            !RESERVED_GREENHOUSE_TOKENS
                .iter()
                .any(|reserved| token.eq_ignore_ascii_case(reserved))
        })
        .map_or_else(|| UNKNOWN_COMPANY.to_string(), naming::capitalize_first);

    Some(Posting::new(
        company,
        hit.title.trim(),
        UNLISTED_LOCATION,
        link,
        PostingSource::AtsDiscovery,
    ))
}

/// A host whose search failed.
#[derive(Debug)]
pub struct DiscoveryFailure {
    /// ATS host that was searched
    pub host: String,
    /// What went wrong
    pub error: ScanError,
}

/// Postings found for one keyword, plus the hosts that failed.
#[derive(Debug, Default)]
pub struct DiscoveryOutcome {
    /// Postings in host order, then result order
    pub postings: Vec<Posting>,
    /// Failed searches
    pub failures: Vec<DiscoveryFailure>,
}

/// Searches every ATS host for a keyword.
#[derive(Clone)]
pub struct AtsDiscovery {
    engine: Arc<dyn WebSearch>,
    results_per_host: u32,
    min_delay: Duration,
    max_delay: Duration,
}

impl AtsDiscovery {
    /// Discovery over `engine` with the configured limits.
    #[must_use]
    pub fn new(engine: Arc<dyn WebSearch>, config: &DiscoveryConfig) -> Self {
        let (min_delay, max_delay) = config.delay_range();
        Self {
            engine,
            results_per_host: config.results_per_host,
            min_delay,
            max_delay,
        }
    }

    /// Maximum postings kept per host.
    #[must_use]
    pub fn with_results_per_host(mut self, results: u32) -> Self {
        self.results_per_host = results;
        self
    }

    /// Pause range between two searches; `max` below `min` is raised to `min`.
    #[must_use]
    pub fn with_delay(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min;
        self.max_delay = max.max(min);
        self
    }

    /// Search each host in [`DISCOVERY_HOSTS`] for `keyword`.
    ///
    /// A failed search is recorded and the next host is still searched.
    pub async fn discover(&self, keyword: &str) -> DiscoveryOutcome {
        let mut outcome = DiscoveryOutcome::default();
        let limit = usize::try_from(self.results_per_host).unwrap_or(usize::MAX);

        for (index, (host, _)) in DISCOVERY_HOSTS.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pause()).await;
            }

            let query = site_query(host, keyword);
            tracing::info!(engine = self.engine.engine_id(), %query, "searching ATS host");

            match self.engine.search(&query, self.results_per_host).await {
                Ok(hits) => {
                    let before = outcome.postings.len();
                    outcome
                        .postings
                        .extend(hits.iter().filter_map(hit_to_posting).take(limit));
                    tracing::debug!(
                        host,
                        hits = hits.len(),
                        kept = outcome.postings.len() - before,
                        "ATS host searched"
                    );
                }
                Err(error) => {
                    tracing::warn!(host, error = %error, "ATS host search failed");
                    outcome.failures.push(DiscoveryFailure {
                        host: (*host).to_string(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            keyword,
            found = outcome.postings.len(),
            failed = outcome.failures.len(),
            "ATS discovery finished"
        );
        outcome
    }

    fn pause(&self) -> Duration {
        if self.max_delay <= self.min_delay {
            self.min_delay
        } else {
            rand::thread_rng().gen_range(self.min_delay..=self.max_delay)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::time::Instant;

    struct CannedWebSearch {
        answers: HashMap<String, Vec<WebHit>>,
        queries: Mutex<Vec<(String, u32)>>,
    }

    impl CannedWebSearch {
        fn new(answers: impl IntoIterator<Item = (String, Vec<WebHit>)>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<(String, u32)> {
            self.queries.lock().expect("queries lock").clone()
        }
    }

    #[async_trait]
    impl WebSearch for CannedWebSearch {
        fn engine_id(&self) -> &str {
            "canned"
        }

        async fn search(&self, query: &str, max_results: u32) -> Result<Vec<WebHit>> {
            self.queries
                .lock()
                .expect("queries lock")
                .push((query.to_string(), max_results));
            self.answers
                .get(query)
                .cloned()
                .ok_or_else(|| ScanError::provider("canned", "rate limited"))
        }
    }

    fn hit(url: &str, title: &str) -> WebHit {
        WebHit {
            url: url.to_string(),
            title: title.to_string(),
            description: String::new(),
        }
    }

    fn config() -> DiscoveryConfig {
        DiscoveryConfig {
            min_delay_ms: 0,
            max_delay_ms: 0,
            ..DiscoveryConfig::default()
        }
    }

    #[test]
    fn test_site_query() {
        assert_eq!(
            site_query("jobs.lever.co", " Research Scientist "),
            "site:jobs.lever.co \"Research Scientist\""
        );
    }

    #[test]
    fn test_hit_to_posting() {
        let posting = hit_to_posting(&hit(
            "https://boards.greenhouse.io/acme/jobs/123",
            " Research Scientist ",
        ))
        .expect("greenhouse hit");
        assert_eq!(posting.company, "Acme");
        assert_eq!(posting.title, "Research Scientist");
        assert_eq!(posting.location, UNLISTED_LOCATION);
        assert_eq!(posting.job_url, "https://boards.greenhouse.io/acme/jobs/123");
        assert_eq!(posting.source, PostingSource::AtsDiscovery);

        let posting = hit_to_posting(&hit("https://jobs.ashbyhq.com/notion/abc", "Designer"))
            .expect("ashby hit");
        assert_eq!(posting.company, "Notion");

        let posting = hit_to_posting(&hit(
            "https://boards.greenhouse.io/embed/job_app?for=acme",
            "Chemist",
        ))
        .expect("embed hit");
        assert_eq!(posting.company, UNKNOWN_COMPANY);
    }

    #[test]
    fn test_hit_off_ats_domain_dropped() {
        assert!(hit_to_posting(&hit("https://www.clever.com/careers", "Careers")).is_none());
        assert!(hit_to_posting(&hit("https://www.linkedin.com/jobs/view/1", "Chemist")).is_none());
        assert!(hit_to_posting(&hit("not a url", "Chemist")).is_none());
    }

    #[tokio::test]
    async fn test_discover_searches_each_host_in_order() {
        let engine = Arc::new(CannedWebSearch::new([
            (
                site_query("boards.greenhouse.io", "chemist"),
                vec![
                    hit("https://boards.greenhouse.io/acme/jobs/1", "Chemist"),
                    hit("https://www.example.com/chemist", "Not a board"),
                    hit("https://job-boards.greenhouse.io/beta/jobs/2", "Chemist II"),
                ],
            ),
            (
                site_query("jobs.ashbyhq.com", "chemist"),
                vec![hit("https://jobs.ashbyhq.com/gamma/3", "Lab Chemist")],
            ),
        ]));
        let discovery = AtsDiscovery::new(engine.clone(), &config()).with_results_per_host(5);

        let outcome = discovery.discover("chemist").await;

        let companies: Vec<&str> = outcome.postings.iter().map(|p| p.company.as_str()).collect();
        assert_eq!(companies, vec!["Acme", "Beta", "Gamma"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].host, "jobs.lever.co");

        let queries = engine.queries();
        assert_eq!(
            queries,
            vec![
                ("site:boards.greenhouse.io \"chemist\"".to_string(), 5),
                ("site:jobs.lever.co \"chemist\"".to_string(), 5),
                ("site:jobs.ashbyhq.com \"chemist\"".to_string(), 5),
            ]
        );
    }

    #[tokio::test]
    async fn test_discover_caps_results_per_host() {
        let hits = (1..=4)
            .map(|i| hit(&format!("https://jobs.lever.co/acme/{i}"), "Chemist"))
            .collect();
        let engine = Arc::new(CannedWebSearch::new([(
            site_query("jobs.lever.co", "chemist"),
            hits,
        )]));
        let discovery = AtsDiscovery::new(engine, &config()).with_results_per_host(2);

        let outcome = discovery.discover("chemist").await;
        assert_eq!(outcome.postings.len(), 2);
        assert_eq!(outcome.postings[1].job_url, "https://jobs.lever.co/acme/2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_discover_pauses_between_searches() {
        let engine = Arc::new(CannedWebSearch::new([]));
        let discovery = AtsDiscovery::new(engine, &config())
            .with_delay(Duration::from_secs(1), Duration::from_secs(3));

        let start = Instant::now();
        let outcome = discovery.discover("chemist").await;
        let elapsed = start.elapsed();

        assert_eq!(outcome.failures.len(), 3);
        assert!(elapsed >= Duration::from_secs(2), "elapsed {elapsed:?}");
        assert!(elapsed <= Duration::from_secs(6), "elapsed {elapsed:?}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_web_search() {
        let engine = CommandWebSearch::from_argv(&[
            "sh".to_string(),
            "-c".to_string(),
            r#"cat >/dev/null; echo '[{"url":"https://jobs.lever.co/acme/1","title":"Chemist"}]'"#
                .to_string(),
        ])
        .expect("engine");

        let hits = engine
            .search("site:jobs.lever.co \"chemist\"", 10)
            .await
            .expect("search");
        assert_eq!(hits, vec![hit("https://jobs.lever.co/acme/1", "Chemist")]);
        assert!(CommandWebSearch::from_config(&DiscoveryConfig::default()).is_none());
    }
}
