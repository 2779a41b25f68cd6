use cms_blob::BlobError;
use cms_index::IndexError;
use cms_types::BlobRef;
use cms_validate::ValidationError;
use thiserror::Error;

use crate::stage::PublishStage;

/// Terminal failures from the publish pipeline.
///
/// Every variant maps to the stage it exited from; callers surface
/// validation problems verbatim and backend problems generically, and can
/// tell from the variant whether the uploaded file was already stored.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The submission failed schema validation. No side effects performed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The blob store failed. The index was never touched, so the system is
    /// left consistent — only the upload needs repeating.
    #[error("blob store failed: {source}")]
    BlobStore {
        #[source]
        source: BlobError,
    },

    /// The index write failed after the blob (if any) was already stored.
    ///
    /// When `orphaned_blob` is set, a file exists in the blob store with no
    /// index record pointing at it — an accepted inconsistency, logged for
    /// manual cleanup. Callers must not re-upload the same file.
    #[error("index write failed: {source}")]
    IndexWrite {
        #[source]
        source: IndexError,
        orphaned_blob: Option<BlobRef>,
    },
}

impl PublishError {
    /// The stage this error exited the pipeline from.
    pub fn stage(&self) -> PublishStage {
        match self {
            Self::Validation(_) => PublishStage::Validating,
            Self::BlobStore { .. } => PublishStage::StoringBlob,
            Self::IndexWrite { .. } => PublishStage::WritingIndex,
        }
    }

    /// Returns `true` if the uploaded file might already be stored.
    pub fn blob_may_be_stored(&self) -> bool {
        match self {
            Self::IndexWrite { orphaned_blob, .. } => orphaned_blob.is_some(),
            _ => false,
        }
    }
}

/// Result alias for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;
