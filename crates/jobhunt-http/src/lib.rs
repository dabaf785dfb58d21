//! Jobhunt HTTP - fetch client for board pages and identity probes.
//!
//! Every request carries a fixed, browser-like header set and its own
//! timeout. Requests to the same host are spaced by a minimum delay so that
//! a wide scan stays polite towards the two ATS vendors, whose hosts are
//! shared by every company on them.
//!
//! Callers talk to the [`HttpFetcher`] trait; [`ReqwestFetcher`] is the
//! production implementation. With the `test-util` feature a canned
//! [`stub::StubFetcher`] is available for offline tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use jobhunt_core::ScanningConfig;
//! use jobhunt_http::{HttpFetcher, ReqwestFetcher};
//!
//! let config = ScanningConfig::default();
//! let fetcher = ReqwestFetcher::new(&config)?;
//! let page = fetcher
//!     .get("https://boards.greenhouse.io/stripe", config.board_timeout())
//!     .await?;
//! if page.is_ok() {
//!     println!("{} bytes from {}", page.body.len(), page.final_url);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod client;
#[allow(missing_docs)]
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod stub;
pub mod throttle;

// Re-export commonly used types
pub use client::{FetchResponse, HttpFetcher, ReqwestFetcher};
pub use error::{FetchError, Result};
pub use throttle::HostThrottle;
