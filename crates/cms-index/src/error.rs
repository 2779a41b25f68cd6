use cms_types::RecordId;
use thiserror::Error;

/// Errors from index store operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The backend rejected or could not complete the request
    /// (network failure, auth failure, unexpected status).
    #[error("index store unavailable: {0}")]
    Unavailable(String),

    /// The operation did not complete within its bound.
    #[error("index store operation timed out")]
    Timeout,

    /// The backing store detected a concurrent modification via its
    /// optimistic-concurrency token and rejected the write.
    ///
    /// The only retryable error in the pipeline: re-fetch current state and
    /// retry with a fresh token.
    #[error("concurrent modification detected, write rejected")]
    StaleWrite,

    /// A record with this ID already exists in the index.
    #[error("duplicate record id: {0}")]
    DuplicateId(RecordId),

    /// No record with this ID exists in the index.
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// A record or collection document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for index store operations.
pub type IndexResult<T> = Result<T, IndexError>;

impl From<reqwest::Error> for IndexError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
