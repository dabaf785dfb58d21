use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Transport-level failures. HTTP status codes are not errors here; they are
/// reported on [`crate::FetchResponse`] and judged by the caller.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request to {0} timed out")]
    Timeout(String),

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl FetchError {
    pub(crate) fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(url.to_string())
        } else {
            Self::Transport {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}
