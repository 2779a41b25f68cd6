use std::sync::Arc;

use cms_blob::BlobStore;
use cms_index::{IndexError, IndexStore};
use cms_types::{ContentItem, ContentType, FieldMap, RecordId};

use crate::error::{PublishError, PublishResult};
use crate::retry::RetryPolicy;

/// An uploaded file accompanying a submission.
#[derive(Clone, Debug)]
pub struct Upload {
    /// Filename as submitted; contributes only the storage extension.
    pub name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// The publish orchestrator.
///
/// Drives a submission through validate → store blob → append index. The
/// blob write strictly precedes the index write within one call; between
/// concurrent calls no ordering is guaranteed, and list order reflects
/// whichever index write lands last.
///
/// Adapters are injected per deployment environment, so tests run against
/// in-memory fakes without process-wide state.
pub struct Publisher {
    blob: Arc<dyn BlobStore>,
    index: Arc<dyn IndexStore>,
    retry: RetryPolicy,
}

impl Publisher {
    /// Create a publisher over the given adapters with the default retry
    /// policy (3 attempts).
    pub fn new(blob: Arc<dyn BlobStore>, index: Arc<dyn IndexStore>) -> Self {
        Self {
            blob,
            index,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the stale-write retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Publish a new content item.
    ///
    /// On validation failure nothing was written. On a blob failure the
    /// index was never touched. On an index failure the stored blob (if
    /// any) is orphaned: logged for manual cleanup and carried in the error
    /// so the caller does not re-upload.
    pub async fn publish(
        &self,
        content_type: ContentType,
        fields: FieldMap,
        file: Option<Upload>,
    ) -> PublishResult<ContentItem> {
        cms_validate::validate(content_type, &fields, file.is_some())?;

        let blob = match &file {
            Some(upload) => Some(
                self.blob
                    .store(content_type, &upload.bytes, &upload.name)
                    .await
                    .map_err(|source| PublishError::BlobStore { source })?,
            ),
            None => None,
        };

        let item = ContentItem::new(content_type, fields, blob);

        if let Err(source) = self.append_with_retry(&item).await {
            if let Some(blob_ref) = &item.blob {
                // Accepted inconsistency: no compensation step exists, the
                // blob stays behind for manual cleanup.
                tracing::warn!(
                    key = %blob_ref.key,
                    id = %item.id,
                    "orphaned blob: index write failed after blob was stored"
                );
            }
            return Err(PublishError::IndexWrite {
                source,
                orphaned_blob: item.blob.clone(),
            });
        }

        tracing::info!(id = %item.id, %content_type, "published content item");
        Ok(item)
    }

    /// Edit the metadata fields of an existing record. No file step: the
    /// blob reference is immutable after publication.
    pub async fn update(
        &self,
        content_type: ContentType,
        id: RecordId,
        patch: FieldMap,
    ) -> PublishResult<()> {
        cms_validate::validate_patch(content_type, &patch)?;

        let mut attempt = 1u32;
        loop {
            match self.index.update(content_type, id, &patch).await {
                Err(IndexError::StaleWrite) if attempt < self.retry.max_attempts => {
                    tracing::warn!(%id, attempt, "stale index write on update, retrying");
                    tokio::time::sleep(self.retry.backoff(attempt)).await;
                    attempt += 1;
                }
                Err(source) => {
                    return Err(PublishError::IndexWrite {
                        source,
                        orphaned_blob: None,
                    })
                }
                Ok(()) => {
                    tracing::info!(%id, %content_type, "updated content item");
                    return Ok(());
                }
            }
        }
    }

    /// Append, transparently retrying stale writes up to the policy bound.
    async fn append_with_retry(&self, item: &ContentItem) -> Result<RecordId, IndexError> {
        let mut attempt = 1u32;
        loop {
            match self.index.append(item).await {
                Err(IndexError::StaleWrite) if attempt < self.retry.max_attempts => {
                    tracing::warn!(
                        id = %item.id,
                        attempt,
                        "stale index write on append, retrying with fresh state"
                    );
                    tokio::time::sleep(self.retry.backoff(attempt)).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("retry", &self.retry)
            .finish()
    }
}
