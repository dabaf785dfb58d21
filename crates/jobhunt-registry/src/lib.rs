//! Jobhunt Registry - the persisted list of monitored companies.
//!
//! The registry is an explicit value: load it once with [`RegistryStore`],
//! pass it by reference to scans and merges, and save it once at the end of
//! the cycle. Nothing here is safe for concurrent writers, and nothing needs
//! to be, because callers serialize their load-mutate-save cycles.
//!
//! [`MergeEngine`] implements auto-discovery: postings observed by any scan
//! are resolved to ATS boards and the genuinely new companies are appended.
//! Uniqueness is always judged on normalized names and URLs, which makes
//! repeated merges of the same batch a no-op.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod entry;
pub mod error;
pub mod merge;
pub mod registry;
pub mod store;

// Re-export commonly used types
pub use entry::{AggregatorCompany, AtsCompany};
pub use error::{RegistryError, Result};
pub use merge::MergeEngine;
pub use registry::Registry;
pub use store::RegistryStore;
