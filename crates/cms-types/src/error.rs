use thiserror::Error;

/// Errors from foundation type construction and parsing.
#[derive(Debug, Error)]
pub enum TypeError {
    /// The string does not name a recognized content type.
    #[error("unknown content type: {0}")]
    UnknownContentType(String),

    /// The string is not a valid record identifier.
    #[error("invalid record id: {0}")]
    InvalidRecordId(String),
}
