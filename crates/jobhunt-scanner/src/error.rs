use thiserror::Error;

/// Errors surfaced by scans and searches.
///
/// Per-target failures never abort a batch: they are recorded next to the
/// target and logged. These variants describe what went wrong for that one
/// target, or a batch that could not start at all.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("search provider {provider} failed: {reason}")]
    Provider { provider: String, reason: String },

    #[error("search provider {provider} returned malformed output: {source}")]
    ProviderOutput {
        provider: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no search provider configured")]
    NoProvider,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    pub(crate) fn provider(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
