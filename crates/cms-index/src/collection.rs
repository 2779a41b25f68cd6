use std::sync::Arc;

use async_trait::async_trait;
use cms_types::{ContentItem, ContentType, FieldMap, RecordId};

use crate::document::DocumentStore;
use crate::error::{IndexError, IndexResult};
use crate::traits::{sort_newest_first, IndexStore};

/// Index store keeping each content type's records as one JSON document.
///
/// The document at `content/{type}.json` holds the whole collection as a
/// JSON array, parsed and re-serialized wholesale on every write — never
/// string-patched. Appends and updates are read-modify-write cycles guarded
/// by the document store's version token; a token mismatch surfaces as
/// [`IndexError::StaleWrite`] for the caller to retry with fresh state.
///
/// A document that does not exist yet is an empty collection, not an error.
pub struct CollectionIndexStore {
    docs: Arc<dyn DocumentStore>,
}

impl CollectionIndexStore {
    /// Create a collection index over the given document store.
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs }
    }

    /// Document path for a content type's collection.
    pub fn doc_path(content_type: ContentType) -> String {
        format!("content/{content_type}.json")
    }

    /// Load and decode the collection plus its version token.
    async fn load_collection(
        &self,
        content_type: ContentType,
    ) -> IndexResult<(Vec<ContentItem>, Option<crate::document::DocVersion>)> {
        match self.docs.load(&Self::doc_path(content_type)).await? {
            None => Ok((Vec::new(), None)),
            Some((bytes, version)) => {
                let items: Vec<ContentItem> = serde_json::from_slice(&bytes)?;
                Ok((items, Some(version)))
            }
        }
    }

    /// Encode and save the collection under the expected version.
    async fn save_collection(
        &self,
        content_type: ContentType,
        items: &[ContentItem],
        expected: Option<&crate::document::DocVersion>,
    ) -> IndexResult<()> {
        let bytes = serde_json::to_vec_pretty(items)?;
        self.docs
            .save(&Self::doc_path(content_type), &bytes, expected)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl IndexStore for CollectionIndexStore {
    async fn append(&self, item: &ContentItem) -> IndexResult<RecordId> {
        let (mut items, version) = self.load_collection(item.content_type).await?;

        if items.iter().any(|r| r.id == item.id) {
            return Err(IndexError::DuplicateId(item.id));
        }

        // New records go at the front; the document stays newest-first.
        items.insert(0, item.clone());
        self.save_collection(item.content_type, &items, version.as_ref())
            .await?;
        Ok(item.id)
    }

    async fn list_all(&self, content_type: ContentType) -> IndexResult<Vec<ContentItem>> {
        let (mut items, _) = self.load_collection(content_type).await?;
        sort_newest_first(&mut items);
        Ok(items)
    }

    async fn update(
        &self,
        content_type: ContentType,
        id: RecordId,
        patch: &FieldMap,
    ) -> IndexResult<()> {
        let (mut items, version) = self.load_collection(content_type).await?;

        let record = items
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(IndexError::NotFound(id))?;
        record.apply_patch(patch);

        self.save_collection(content_type, &items, version.as_ref())
            .await
    }
}

impl std::fmt::Debug for CollectionIndexStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionIndexStore").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use cms_types::{field_map, BlobRef, FieldValue};

    use crate::document::InMemoryDocumentStore;

    fn make_index() -> (Arc<InMemoryDocumentStore>, CollectionIndexStore) {
        let docs = Arc::new(InMemoryDocumentStore::new());
        let index = CollectionIndexStore::new(Arc::clone(&docs) as Arc<dyn DocumentStore>);
        (docs, index)
    }

    fn achievement(title: &str) -> ContentItem {
        ContentItem::new(
            ContentType::Achievement,
            field_map([("title", title), ("description", "d"), ("year", "2026")]),
            None,
        )
    }

    #[tokio::test]
    async fn missing_document_is_an_empty_collection() {
        let (_, index) = make_index();
        assert!(index
            .list_all(ContentType::Achievement)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn first_append_creates_the_document() {
        let (docs, index) = make_index();
        let item = achievement("Smart India Hackathon");
        index.append(&item).await.unwrap();

        assert_eq!(docs.len(), 1);
        let listed = index.list_all(ContentType::Achievement).await.unwrap();
        assert_eq!(listed, vec![item]);
    }

    #[tokio::test]
    async fn document_is_valid_json_array() {
        let (docs, index) = make_index();
        index.append(&achievement("a")).await.unwrap();
        index.append(&achievement("b")).await.unwrap();

        let (bytes, _) = docs
            .load(&CollectionIndexStore::doc_path(ContentType::Achievement))
            .await
            .unwrap()
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn new_records_land_at_the_front() {
        let (_, index) = make_index();
        let mut old = achievement("older");
        old.created_at = Utc::now() - Duration::hours(1);
        let new = achievement("newer");

        index.append(&old).await.unwrap();
        index.append(&new).await.unwrap();

        let listed = index.list_all(ContentType::Achievement).await.unwrap();
        assert_eq!(listed[0].id, new.id);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected_without_writing() {
        let (docs, index) = make_index();
        let item = achievement("once");
        index.append(&item).await.unwrap();
        let (bytes_before, _) = docs
            .load(&CollectionIndexStore::doc_path(ContentType::Achievement))
            .await
            .unwrap()
            .unwrap();

        let err = index.append(&item).await.unwrap_err();
        assert!(matches!(err, IndexError::DuplicateId(_)));

        let (bytes_after, _) = docs
            .load(&CollectionIndexStore::doc_path(ContentType::Achievement))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bytes_before, bytes_after);
    }

    #[tokio::test]
    async fn update_patches_fields_in_place() {
        let (_, index) = make_index();
        let item = ContentItem::new(
            ContentType::Event,
            field_map([
                ("title", "Tech talk"),
                ("description", "d"),
                ("date", "2026-09-01"),
                ("time", "10:00"),
                ("venue", "Seminar Hall"),
            ]),
            Some(BlobRef::new("event/p.png", "memory://event/p.png")),
        );
        index.append(&item).await.unwrap();

        index
            .update(
                ContentType::Event,
                item.id,
                &field_map([("venue", "Auditorium")]),
            )
            .await
            .unwrap();

        let listed = index.list_all(ContentType::Event).await.unwrap();
        assert_eq!(listed[0].fields["venue"], FieldValue::from("Auditorium"));
        assert_eq!(listed[0].blob, item.blob);
        assert_eq!(listed[0].created_at, item.created_at);
    }

    #[tokio::test]
    async fn update_missing_record_errors() {
        let (_, index) = make_index();
        index.append(&achievement("only")).await.unwrap();

        let err = index
            .update(
                ContentType::Achievement,
                RecordId::new(),
                &field_map([("title", "x")]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::NotFound(_)));
    }

    #[tokio::test]
    async fn stale_token_is_rejected_after_concurrent_write() {
        let (docs, index) = make_index();
        index.append(&achievement("first")).await.unwrap();

        // Hold the token an append would have loaded, then let a concurrent
        // append land before "our" save presents it.
        let path = CollectionIndexStore::doc_path(ContentType::Achievement);
        let (bytes, stale) = docs.load(&path).await.unwrap().unwrap();
        index.append(&achievement("interloper")).await.unwrap();

        let err = docs.save(&path, &bytes, Some(&stale)).await.unwrap_err();
        assert!(matches!(err, IndexError::StaleWrite));

        // Both records survive; the stale write changed nothing.
        let listed = index.list_all(ContentType::Achievement).await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn collections_are_separate_documents() {
        let (docs, index) = make_index();
        index.append(&achievement("a")).await.unwrap();
        index
            .append(&ContentItem::new(
                ContentType::Placement,
                field_map([
                    ("company", "Acme"),
                    ("position", "SDE"),
                    ("package", "12 LPA"),
                    ("year", "2026"),
                ]),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(docs.len(), 2);
    }
}
