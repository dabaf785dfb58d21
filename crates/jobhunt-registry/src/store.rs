//! TOML persistence for the registry.

use crate::error::{RegistryError, Result};
use crate::registry::Registry;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads and saves a [`Registry`] at a fixed path.
///
/// The store holds no registry state of its own; callers load once, mutate,
/// and save once per cycle.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    /// Store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The registry file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the registry. A missing file is an empty registry.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Registry> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "registry file not found, starting empty");
            return Ok(Registry::new());
        }

        let contents =
            fs::read_to_string(&self.path).map_err(|e| RegistryError::io(&self.path, e))?;
        let registry: Registry = toml::from_str(&contents).map_err(|source| RegistryError::Parse {
            path: self.path.clone(),
            source,
        })?;

        registry.warn_duplicates();
        tracing::debug!(
            path = %self.path.display(),
            ats = registry.ats_companies.len(),
            aggregator = registry.aggregator_companies.len(),
            "loaded registry"
        );
        Ok(registry)
    }

    /// Overwrite the registry file with `registry`.
    ///
    /// The new contents go to a sibling temp file which is then renamed over
    /// the target, so readers never see a half-written file. The parent
    /// directory is created if needed.
    ///
    /// # Errors
    /// Returns error if serialization or any filesystem step fails.
    pub fn save(&self, registry: &Registry) -> Result<()> {
        let contents = toml::to_string_pretty(registry)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RegistryError::io(parent, e))?;
        }

        let tmp_path = self.temp_path();
        fs::write(&tmp_path, contents).map_err(|e| RegistryError::io(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(RegistryError::io(&self.path, e));
        }

        tracing::info!(
            path = %self.path.display(),
            entries = registry.len(),
            "saved registry"
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
