use jobhunt_http::FetchError;
use thiserror::Error;

/// Why the embedded Greenhouse loader state could not be used.
///
/// Never surfaced to callers: the parser falls back to the DOM instead.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no embedded loader state in page")]
    MissingPayload,

    #[error("embedded loader state is not valid JSON: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("loader state has no jobPosts collection")]
    MissingJobPosts,
}

/// Failure to obtain a board page.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("board {url} answered HTTP {status}")]
    Status { url: String, status: u16 },
}
