use std::fmt;

/// The stages a publish call moves through, in order.
///
/// Terminal errors name the stage they failed in, so a caller always knows
/// whether the uploaded file might already be stored (and must not be
/// re-uploaded blindly).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishStage {
    /// Checking the submission against the content type's schema.
    Validating,
    /// Writing the uploaded file to the blob store.
    StoringBlob,
    /// Appending the metadata record to the index.
    WritingIndex,
    /// Both writes landed; the record is visible to readers.
    Published,
}

impl PublishStage {
    /// Returns `true` if a failure in this stage may leave a stored blob
    /// behind with no index record.
    pub fn blob_may_be_stored(&self) -> bool {
        matches!(self, Self::WritingIndex | Self::Published)
    }
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::StoringBlob => "storing-blob",
            Self::WritingIndex => "writing-index",
            Self::Published => "published",
        };
        f.write_str(name)
    }
}
