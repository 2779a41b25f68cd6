use async_trait::async_trait;
use cms_types::{ContentItem, ContentType, FieldMap, RecordId};

use crate::error::IndexResult;

/// Structured storage for published-content records.
///
/// All implementations must satisfy these invariants:
/// - Record IDs are unique across the lifetime of the index; `append` fails
///   with `DuplicateId` rather than replacing an existing record.
/// - `list_all` returns records newest first (creation time descending,
///   record id as tie-breaker); an empty sequence means nothing published.
/// - `update` replaces metadata fields only; the blob reference and creation
///   timestamp of a record never change after publication.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Append a freshly published record.
    async fn append(&self, item: &ContentItem) -> IndexResult<RecordId>;

    /// All records of `content_type`, newest first.
    async fn list_all(&self, content_type: ContentType) -> IndexResult<Vec<ContentItem>>;

    /// Merge `patch` into the fields of the record identified by `id`.
    async fn update(
        &self,
        content_type: ContentType,
        id: RecordId,
        patch: &FieldMap,
    ) -> IndexResult<()>;
}

/// Order records newest first: creation time descending, then id descending
/// (v7 ids are time-ordered, so the tie-break stays chronological).
pub fn sort_newest_first(items: &mut [ContentItem]) {
    items.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
