//! Jobhunt Scanner - registry-driven scans and generic job search.
//!
//! # Features
//!
//! - ATS-direct scans: every registry board fetched concurrently with a
//!   bounded worker pool and per-company failure isolation
//! - Aggregator scans: one search-provider query per monitored company,
//!   filtered to rows that really belong to that company
//! - Multi-term job search with de-duplication on `job_url`
//! - Direct application link verification with soft-404 detection
//! - ATS discovery through site-restricted web search
//!
//! # Example
//!
//! ```rust,ignore
//! use jobhunt_scanner::{KeywordFilter, ScanOrchestrator};
//!
//! let orchestrator = ScanOrchestrator::new(scraper).with_max_concurrent_scans(10);
//! let filter = KeywordFilter::new(["scientist"]);
//! let report = orchestrator.scan_ats_companies(&registry, Some(&filter)).await;
//! for posting in report.postings() {
//!     println!("{}\t{}", posting.company, posting.title);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod discovery;
#[allow(missing_docs)]
pub mod error;
pub mod filter;
pub mod job_search;
pub mod orchestrator;
pub mod search;
pub mod verify;

// Re-export commonly used types
pub use discovery::{
    AtsDiscovery, CommandWebSearch, DiscoveryFailure, DiscoveryOutcome, WebHit, WebSearch,
};
pub use error::{Result, ScanError};
pub use filter::{company_matches, KeywordFilter};
pub use job_search::{dedup_by_job_url, split_terms, JobSearch, SearchFailure, SearchOutcome};
pub use orchestrator::{CompanyScanResult, ScanOrchestrator, ScanReport};
pub use search::{CommandSearchProvider, SearchProvider, SearchQuery, SearchRow};
pub use verify::{LinkStatus, LinkVerifier};
