use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ContentType;
use crate::error::TypeError;
use crate::field::FieldMap;

/// Unique identifier for a published record (UUID v7 for time-ordering).
///
/// Generated once at publish time and never reused. The v7 layout means
/// lexicographic order tracks creation order, which the index uses as a
/// tie-breaker when two records share a timestamp.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(uuid::Uuid);

impl RecordId {
    /// Generate a new time-ordered record ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Short representation (first 8 characters).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.short_id())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TypeError::InvalidRecordId(s.to_string()))
    }
}

/// Durable reference to an uploaded file.
///
/// `key` is the storage path (`{content_type}/{token}.{ext}`), chosen by the
/// blob store, never by the caller. `url` is the public address views embed.
/// Both are immutable once the record is published.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRef {
    /// Storage key within the blob backend.
    pub key: String,
    /// Publicly resolvable URL for the stored bytes.
    pub url: String,
}

impl BlobRef {
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// The unit published through the pipeline.
///
/// A `ContentItem` becomes visible to readers only after both the blob write
/// and the index write have succeeded. After publication only `fields` may
/// change (through an explicit update); `id`, `blob`, and `created_at` are
/// fixed for the record's lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique record identifier, generated at publish time.
    pub id: RecordId,
    /// Category the record belongs to.
    pub content_type: ContentType,
    /// Reference to the uploaded file, when the category carries one.
    pub blob: Option<BlobRef>,
    /// Type-specific metadata attributes.
    pub fields: FieldMap,
    /// Publication timestamp (serialized as ISO-8601).
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    /// Construct a freshly published item with a new ID and the current time.
    pub fn new(content_type: ContentType, fields: FieldMap, blob: Option<BlobRef>) -> Self {
        Self {
            id: RecordId::new(),
            content_type,
            blob,
            fields,
            created_at: Utc::now(),
        }
    }

    /// Merge a patch into this item's fields, replacing existing attributes.
    ///
    /// `blob` and `created_at` are deliberately untouched; see the update
    /// contract on the index store.
    pub fn apply_patch(&mut self, patch: &FieldMap) {
        for (name, value) in patch {
            self.fields.insert(name.clone(), value.clone());
        }
    }
}
