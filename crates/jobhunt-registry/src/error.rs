//! Error types for registry persistence and editing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, editing or saving the registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// I/O error while reading or writing the registry file
    #[error("registry I/O error on {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Registry could not be serialized to TOML
    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Registry file is not valid TOML or has the wrong shape
    #[error("failed to parse registry {path}: {source}")]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// An entry with the same normalized name or URL already exists
    #[error("company already registered: {0}")]
    Duplicate(String),

    /// No entry with the given name exists
    #[error("company not found in registry: {0}")]
    NotFound(String),
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::Duplicate("Stripe".to_string());
        assert_eq!(err.to_string(), "company already registered: Stripe");

        let err = RegistryError::io(
            "/tmp/companies.toml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/companies.toml"));
    }
}
