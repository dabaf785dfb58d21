//! Configuration management for jobhunt.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::JobType;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the company registry inside the data directory.
pub const DEFAULT_REGISTRY_FILE: &str = "companies.toml";

/// Main application configuration.
///
/// This is loaded from `~/.config/jobhunt/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Network and concurrency settings for scans
    pub scanning: ScanningConfig,
    /// Defaults for generic job search queries
    pub search: SearchConfig,
    /// Company registry location
    pub registry: RegistryConfig,
    /// Site-restricted web search for ATS-hosted postings
    pub discovery: DiscoveryConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `JOBHUNT_CONCURRENT_SCANS`: Override the worker pool size
    /// - `JOBHUNT_REGISTRY_PATH`: Override the registry file location
    /// - `JOBHUNT_USER_AGENT`: Override the HTTP `User-Agent`
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `JOBHUNT_*` environment overrides in place.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("JOBHUNT_CONCURRENT_SCANS") {
            if let Ok(workers) = val.parse() {
                self.scanning.concurrent_scans = workers;
                tracing::debug!("Override scanning.concurrent_scans from env: {}", workers);
            }
        }

        if let Ok(val) = std::env::var("JOBHUNT_REGISTRY_PATH") {
            if !val.is_empty() {
                tracing::debug!("Override registry.path from env: {}", val);
                self.registry.path = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = std::env::var("JOBHUNT_USER_AGENT") {
            if !val.is_empty() {
                tracing::debug!("Override scanning.user_agent from env");
                self.scanning.user_agent = val;
            }
        }
    }

    /// Check values that would make scanning impossible.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scanning.concurrent_scans == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.concurrent_scans".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.scanning.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scanning.user_agent".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }
        if self.discovery.max_delay_ms < self.discovery.min_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "discovery.max_delay_ms".to_string(),
                reason: "must not be below discovery.min_delay_ms".to_string(),
            });
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/jobhunt/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/jobhunt`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    /// Resolve the registry file: the configured path, or
    /// `companies.toml` inside the data directory.
    pub fn registry_path(&self) -> ConfigResult<PathBuf> {
        match &self.registry.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join(DEFAULT_REGISTRY_FILE)),
        }
    }

    fn project_dirs() -> ConfigResult<ProjectDirs> {
        ProjectDirs::from("com", "jobhunt", "jobhunt").ok_or(ConfigError::NoConfigDir)
    }
}

/// Network and concurrency settings for scans.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Size of the worker pool used for per-company tasks
    pub concurrent_scans: usize,
    /// Timeout for full board page fetches
    pub board_timeout_secs: u64,
    /// Timeout for the content-scan GET of identity resolution
    pub content_scan_timeout_secs: u64,
    /// Timeout for name-guess HEAD probes
    pub probe_timeout_secs: u64,
    /// Timeout for direct-link verification
    pub verify_timeout_secs: u64,
    /// Minimum gap between two requests to the same host (0 = none)
    pub min_host_delay_ms: u64,
    /// `User-Agent` header sent with every request
    pub user_agent: String,
    /// `Accept` header sent with every request
    pub accept: String,
    /// `Accept-Language` header sent with every request
    pub accept_language: String,
}

impl ScanningConfig {
    /// Board fetch timeout.
    #[must_use]
    pub fn board_timeout(&self) -> Duration {
        Duration::from_secs(self.board_timeout_secs)
    }

    /// Content-scan timeout.
    #[must_use]
    pub fn content_scan_timeout(&self) -> Duration {
        Duration::from_secs(self.content_scan_timeout_secs)
    }

    /// Name-probe timeout.
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Link verification timeout.
    #[must_use]
    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }

    /// Politeness gap per host.
    #[must_use]
    pub fn min_host_delay(&self) -> Duration {
        Duration::from_millis(self.min_host_delay_ms)
    }
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            concurrent_scans: 10,
            board_timeout_secs: 15,
            content_scan_timeout_secs: 5,
            probe_timeout_secs: 2,
            verify_timeout_secs: 10,
            min_host_delay_ms: 250,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,\
                     image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
        }
    }
}

/// Defaults for generic job search queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Job boards to query (provider-specific names)
    pub sites: Vec<String>,
    /// Location passed when an entry or command gives none
    pub location: String,
    /// Recency window in hours
    pub hours_old: u32,
    /// Maximum results per site
    pub results_wanted: u32,
    /// Job types to search for; empty means any
    pub job_types: Vec<JobType>,
    /// Restrict to remote postings
    pub is_remote: bool,
    /// Country code for providers that need one
    pub country: String,
    /// Command line of the external search provider bridge
    pub command: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            sites: vec![
                "indeed".to_string(),
                "linkedin".to_string(),
                "glassdoor".to_string(),
            ],
            location: "USA".to_string(),
            hours_old: 24,
            results_wanted: 20,
            job_types: Vec::new(),
            is_remote: false,
            country: "USA".to_string(),
            command: Vec::new(),
        }
    }
}

/// Company registry location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry file; defaults to `companies.toml` in the data directory
    pub path: Option<PathBuf>,
}

/// Site-restricted web search for postings hosted on ATS boards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Command line of the external web search bridge
    pub command: Vec<String>,
    /// Maximum postings kept per ATS host
    pub results_per_host: u32,
    /// Lower bound of the random pause between two searches
    pub min_delay_ms: u64,
    /// Upper bound of the random pause between two searches
    pub max_delay_ms: u64,
}

impl DiscoveryConfig {
    /// Pause range between two searches.
    #[must_use]
    pub fn delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            results_per_host: 20,
            min_delay_ms: 1000,
            max_delay_ms: 3000,
        }
    }
}
