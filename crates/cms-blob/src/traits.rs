use async_trait::async_trait;
use cms_types::{BlobRef, ContentType};

use crate::error::BlobResult;

/// Durable storage for uploaded files.
///
/// All implementations must satisfy these invariants:
/// - The store alone derives the final key; callers only suggest a filename.
/// - Keys are write-once: a successful `store` never replaces existing data.
/// - After `store` returns, `read` on the returned key yields byte-identical
///   content until the blob is removed out of band.
/// - Empty uploads are rejected before any backend call.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under a freshly derived key and return its reference.
    ///
    /// `suggested_name` contributes only the file extension.
    async fn store(
        &self,
        content_type: ContentType,
        bytes: &[u8],
        suggested_name: &str,
    ) -> BlobResult<BlobRef>;

    /// Read back the raw bytes stored under `key`.
    async fn read(&self, key: &str) -> BlobResult<Vec<u8>>;
}
