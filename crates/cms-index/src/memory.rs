use std::sync::RwLock;

use async_trait::async_trait;
use cms_types::{ContentItem, ContentType, FieldMap, RecordId};

use crate::error::{IndexError, IndexResult};
use crate::traits::{sort_newest_first, IndexStore};

/// In-memory index store.
///
/// Intended for tests and embedding. All records are held in one `Vec`
/// behind a `RwLock`; records are cloned on read.
pub struct InMemoryIndexStore {
    records: RwLock<Vec<ContentItem>>,
}

impl InMemoryIndexStore {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Total number of records across all content types.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryIndexStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexStore for InMemoryIndexStore {
    async fn append(&self, item: &ContentItem) -> IndexResult<RecordId> {
        let mut records = self.records.write().expect("lock poisoned");
        if records.iter().any(|r| r.id == item.id) {
            return Err(IndexError::DuplicateId(item.id));
        }
        records.push(item.clone());
        Ok(item.id)
    }

    async fn list_all(&self, content_type: ContentType) -> IndexResult<Vec<ContentItem>> {
        let records = self.records.read().expect("lock poisoned");
        let mut matching: Vec<ContentItem> = records
            .iter()
            .filter(|r| r.content_type == content_type)
            .cloned()
            .collect();
        sort_newest_first(&mut matching);
        Ok(matching)
    }

    async fn update(
        &self,
        content_type: ContentType,
        id: RecordId,
        patch: &FieldMap,
    ) -> IndexResult<()> {
        let mut records = self.records.write().expect("lock poisoned");
        let record = records
            .iter_mut()
            .find(|r| r.id == id && r.content_type == content_type)
            .ok_or(IndexError::NotFound(id))?;
        record.apply_patch(patch);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryIndexStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryIndexStore")
            .field("record_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use cms_types::{field_map, BlobRef, FieldValue};

    fn gallery_item(title: &str) -> ContentItem {
        ContentItem::new(
            ContentType::Gallery,
            field_map([("title", title), ("description", "desc")]),
            Some(BlobRef::new(
                format!("gallery/{title}.jpg"),
                format!("memory://gallery/{title}.jpg"),
            )),
        )
    }

    #[tokio::test]
    async fn append_then_list() {
        let index = InMemoryIndexStore::new();
        let item = gallery_item("freshers");
        index.append(&item).await.unwrap();

        let listed = index.list_all(ContentType::Gallery).await.unwrap();
        assert_eq!(listed, vec![item]);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let index = InMemoryIndexStore::new();
        let item = gallery_item("once");
        index.append(&item).await.unwrap();

        let err = index.append(&item).await.unwrap_err();
        assert!(matches!(err, IndexError::DuplicateId(id) if id == item.id));
        assert_eq!(index.len(), 1);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let index = InMemoryIndexStore::new();
        let mut old = gallery_item("old");
        old.created_at = Utc::now() - Duration::hours(2);
        let new = gallery_item("new");

        index.append(&old).await.unwrap();
        index.append(&new).await.unwrap();

        let listed = index.list_all(ContentType::Gallery).await.unwrap();
        assert_eq!(listed[0].id, new.id);
        assert_eq!(listed[1].id, old.id);
    }

    #[tokio::test]
    async fn list_filters_by_content_type() {
        let index = InMemoryIndexStore::new();
        index.append(&gallery_item("photo")).await.unwrap();
        index
            .append(&ContentItem::new(
                ContentType::Placement,
                field_map([("company", "Acme")]),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(index.list_all(ContentType::Gallery).await.unwrap().len(), 1);
        assert_eq!(
            index.list_all(ContentType::Placement).await.unwrap().len(),
            1
        );
        assert!(index.list_all(ContentType::Event).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_index_lists_nothing() {
        let index = InMemoryIndexStore::new();
        assert!(index.list_all(ContentType::Faculty).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_merges_patch() {
        let index = InMemoryIndexStore::new();
        let item = gallery_item("editable");
        index.append(&item).await.unwrap();

        index
            .update(
                ContentType::Gallery,
                item.id,
                &field_map([("title", "renamed")]),
            )
            .await
            .unwrap();

        let listed = index.list_all(ContentType::Gallery).await.unwrap();
        assert_eq!(listed[0].fields["title"], FieldValue::from("renamed"));
        // Untouched field and blob survive.
        assert_eq!(listed[0].fields["description"], FieldValue::from("desc"));
        assert_eq!(listed[0].blob, item.blob);
    }

    #[tokio::test]
    async fn update_missing_record_errors() {
        let index = InMemoryIndexStore::new();
        let err = index
            .update(
                ContentType::Gallery,
                RecordId::new(),
                &field_map([("title", "x")]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_wrong_content_type_errors() {
        let index = InMemoryIndexStore::new();
        let item = gallery_item("typed");
        index.append(&item).await.unwrap();

        let err = index
            .update(ContentType::Event, item.id, &field_map([("title", "x")]))
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::NotFound(_)));
    }
}
