use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use cms_types::{BlobRef, ContentType};

use crate::error::{BlobError, BlobResult};
use crate::key::derive_key;
use crate::traits::BlobStore;

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. All blobs are held in memory behind a
/// `RwLock`; URLs use a `memory://` scheme that resolves nowhere but keeps
/// the record shape identical to the remote backends.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(|b| b.len() as u64)
            .sum()
    }

    /// Keys currently present, sorted.
    pub fn keys(&self) -> Vec<String> {
        let map = self.blobs.read().expect("lock poisoned");
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn store(
        &self,
        content_type: ContentType,
        bytes: &[u8],
        suggested_name: &str,
    ) -> BlobResult<BlobRef> {
        if bytes.is_empty() {
            return Err(BlobError::EmptyBlob);
        }
        let key = derive_key(content_type, suggested_name);
        let url = format!("memory://{key}");

        let mut map = self.blobs.write().expect("lock poisoned");
        // Keys carry a fresh v7 token, so an occupied slot indicates a bug
        // in key derivation rather than a caller race.
        debug_assert!(!map.contains_key(&key));
        map.insert(key.clone(), bytes.to_vec());
        Ok(BlobRef::new(key, url))
    }

    async fn read(&self, key: &str) -> BlobResult<Vec<u8>> {
        let map = self.blobs.read().expect("lock poisoned");
        map.get(key)
            .cloned()
            .ok_or_else(|| BlobError::NotFound(key.to_string()))
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .finish()
    }
}
