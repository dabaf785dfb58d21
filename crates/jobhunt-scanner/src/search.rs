//! Generic job-search provider seam.
//!
//! The multi-site search engine itself is an external collaborator. This
//! module defines the query it receives and the trait the scans call, plus
//! [`CommandSearchProvider`], which bridges to an external program speaking
//! JSON over stdin/stdout.

use crate::error::{Result, ScanError};
use async_trait::async_trait;
use chrono::NaiveDate;
use jobhunt_core::{JobType, Posting, PostingSource, SearchConfig};
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// One query to a search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Job boards to search
    pub sites: Vec<String>,
    /// Free-text search term
    pub search_term: String,
    /// Location text
    pub location: String,
    /// Maximum results per site
    pub results_wanted: u32,
    /// Recency window in hours
    pub hours_old: u32,
    /// Restrict to one job type
    pub job_type: Option<JobType>,
    /// Restrict to remote postings
    pub is_remote: bool,
    /// Country for providers that need one
    pub country: String,
}

impl SearchQuery {
    /// Query for `search_term` using the configured defaults and no job type.
    #[must_use]
    pub fn from_config(search_term: impl Into<String>, config: &SearchConfig) -> Self {
        Self {
            sites: config.sites.clone(),
            search_term: search_term.into(),
            location: config.location.clone(),
            results_wanted: config.results_wanted,
            hours_old: config.hours_old,
            job_type: None,
            is_remote: config.is_remote,
            country: config.country.clone(),
        }
    }

    /// Set the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Restrict to one job type.
    #[must_use]
    pub fn with_job_type(mut self, job_type: Option<JobType>) -> Self {
        self.job_type = job_type;
        self
    }
}

/// A multi-site job search backend.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short identifier used in logs and errors.
    fn provider_id(&self) -> &str;

    /// Run one query.
    ///
    /// # Errors
    /// Returns error if the backend fails; callers treat this as a failure of
    /// this query only.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Posting>>;
}

/// One result row as emitted by the external search program.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchRow {
    /// Job title
    pub title: Option<String>,
    /// Company name
    pub company: Option<String>,
    /// Location text
    pub location: Option<String>,
    /// Posting link on the job board
    pub job_url: Option<String>,
    /// Direct application link on the employer's site
    pub job_url_direct: Option<String>,
    /// Posting date, `YYYY-MM-DD` (a time suffix is ignored)
    pub date_posted: Option<String>,
    /// Job board the row came from
    pub site: Option<String>,
}

impl SearchRow {
    /// Convert to a posting; rows without a `job_url` are dropped.
    #[must_use]
    pub fn into_posting(self) -> Option<Posting> {
        let job_url = non_blank(self.job_url)?;

        let mut posting = Posting::new(
            self.company.unwrap_or_default(),
            self.title.unwrap_or_default(),
            self.location.unwrap_or_default(),
            job_url,
            PostingSource::Site(self.site.unwrap_or_default()),
        );
        if let Some(direct) = non_blank(self.job_url_direct) {
            posting = posting.with_direct_url(direct);
        }
        if let Some(date) = self.date_posted.as_deref().and_then(parse_date) {
            posting = posting.with_date_posted(date);
        }
        Some(posting)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Runs an external program per query.
///
/// The query is written to the program's stdin as JSON; the program must
/// print a JSON array of [`SearchRow`]s to stdout and exit successfully.
#[derive(Debug, Clone)]
pub struct CommandSearchProvider {
    program: String,
    args: Vec<String>,
}

impl CommandSearchProvider {
    /// Provider for an argv; `None` if it is empty.
    #[must_use]
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Provider for the configured `search.command`, if any.
    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Option<Self> {
        Self::from_argv(&config.command)
    }
}

/// Run `program` with `input` on stdin and return its stdout.
///
/// A non-zero exit is a [`ScanError::Provider`] carrying the program's stderr.
pub(crate) async fn run_bridge(program: &str, args: &[String], input: &[u8]) -> Result<Vec<u8>> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ScanError::provider(program, format!("failed to start: {e}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input).await?;
        // Closing stdin signals end of input
        drop(stdin);
    }

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScanError::provider(
            program,
            format!("{}: {}", output.status, stderr.trim()),
        ));
    }

    Ok(output.stdout)
}

#[async_trait]
impl SearchProvider for CommandSearchProvider {
    fn provider_id(&self) -> &str {
        &self.program
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Posting>> {
        let input = serde_json::to_vec(query).map_err(|source| ScanError::ProviderOutput {
            provider: self.program.clone(),
            source,
        })?;

        let stdout = run_bridge(&self.program, &self.args, &input).await?;
        let rows: Vec<SearchRow> =
            serde_json::from_slice(&stdout).map_err(|source| ScanError::ProviderOutput {
                provider: self.program.clone(),
                source,
            })?;

        let total = rows.len();
        let postings: Vec<Posting> = rows.into_iter().filter_map(SearchRow::into_posting).collect();
        tracing::debug!(
            provider = %self.program,
            term = %query.search_term,
            rows = total,
            kept = postings.len(),
            "search provider answered"
        );
        Ok(postings)
    }
}
