//! Typed failures for the two places where the pipeline makes policy decisions:
//! fetching (absorbed per video) and preprocessing (fatal for the run).

use thiserror::Error;

/// A page or reply fetch that did not produce a usable payload.
///
/// The harvester never retries on its own. `is_retryable()` exists so a caller
/// can layer a backoff policy on top without changing the harvest contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout, truncated body.
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status that is not a quota signal.
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },

    /// Daily quota or rate limit exhausted on the platform side.
    #[error("quota exceeded: {0}")]
    Quota(String),

    /// Payload decoded but violates the listing contract (bad JSON, oversized page,
    /// reply attached to the wrong parent).
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::Http { status, .. } => *status == 429 || (500..600).contains(status),
            FetchError::Quota(_) | FetchError::Malformed(_) => false,
        }
    }
}

/// Failures that would silently corrupt the aggregate if absorbed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreprocessError {
    #[error("no harvested records to preprocess; run a harvest first")]
    EmptyHarvest,

    #[error("comment {comment_id}: published_at {value:?} is not an RFC 3339 timestamp")]
    MalformedTimestamp { comment_id: String, value: String },
}
