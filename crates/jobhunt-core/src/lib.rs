//! Jobhunt Core - Foundation crate for the jobhunt workspace.
//!
//! This crate provides shared types, configuration management and the
//! name/URL normalization rules that every other jobhunt crate relies on.
//!
//! # Modules
//!
//! - [`error`] - Configuration error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared records (`Posting`, `AtsVendor`, `PostingSource`)
//! - [`naming`] - Company-name tokens and registry normalization keys
//!
//! # Example
//!
//! ```rust
//! use jobhunt_core::{naming, AppConfig};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.scanning.concurrent_scans, 10);
//!
//! assert_eq!(naming::normalize_name("Stripe, Inc."), naming::normalize_name("stripe"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod naming;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, DiscoveryConfig, RegistryConfig, ScanningConfig, SearchConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::{AtsVendor, JobType, Posting, PostingSource};
