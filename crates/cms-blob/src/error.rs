use thiserror::Error;

/// Errors from blob store operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The upload contained no bytes.
    #[error("blob is empty")]
    EmptyBlob,

    /// No blob is stored under the given key.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// The backend rejected or could not complete the request
    /// (network failure, auth failure, unexpected status).
    #[error("blob store unavailable: {0}")]
    Unavailable(String),

    /// The operation did not complete within its bound.
    ///
    /// Kept distinct from [`Self::Unavailable`] so callers can decide
    /// whether a retry is worthwhile.
    #[error("blob store operation timed out")]
    Timeout,
}

/// Result alias for blob store operations.
pub type BlobResult<T> = Result<T, BlobError>;

impl From<reqwest::Error> for BlobError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}
