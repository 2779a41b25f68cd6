use std::time::Duration;

use async_trait::async_trait;
use cms_types::{BlobRef, ContentType};
use reqwest::StatusCode;

use crate::error::{BlobError, BlobResult};
use crate::key::derive_key;
use crate::traits::BlobStore;

/// Blob store backed by an HTTP object-storage bucket.
///
/// Objects are written with `PUT {endpoint}/object/{bucket}/{key}` under a
/// bearer access key and served publicly from
/// `{endpoint}/object/public/{bucket}/{key}`. The bucket is scoped per
/// deployment; the content-type prefix inside the key separates categories.
pub struct BucketBlobStore {
    client: reqwest::Client,
    endpoint: String,
    bucket: String,
    access_key: String,
}

impl BucketBlobStore {
    /// Create a store against `endpoint` (no trailing slash) with the given
    /// bucket and access key. Every request is bounded by `op_timeout`.
    pub fn new(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key: impl Into<String>,
        op_timeout: Duration,
    ) -> BlobResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(op_timeout)
            .build()
            .map_err(|e| BlobError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            access_key: access_key.into(),
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/object/{}/{}", self.endpoint, self.bucket, key)
    }

    /// Public URL for a stored key, embeddable by read views.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/object/public/{}/{}", self.endpoint, self.bucket, key)
    }
}

#[async_trait]
impl BlobStore for BucketBlobStore {
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

        let response = self
            .client
            .put(self.object_url(&key))
            .bearer_auth(&self.access_key)
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlobError::Unavailable(format!(
                "bucket upload for {key} returned {status}"
            )));
        }

        tracing::debug!(%key, size = bytes.len(), "stored blob in bucket");
        Ok(BlobRef::new(key.clone(), self.public_url(&key)))
    }

    async fn read(&self, key: &str) -> BlobResult<Vec<u8>> {
        let response = self
            .client
            .get(self.object_url(key))
            .bearer_auth(&self.access_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(BlobError::NotFound(key.to_string())),
            status if status.is_success() => {
                Ok(response.bytes().await?.to_vec())
            }
            status => Err(BlobError::Unavailable(format!(
                "bucket read for {key} returned {status}"
            ))),
        }
    }
}

impl std::fmt::Debug for BucketBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Access key deliberately omitted.
        f.debug_struct("BucketBlobStore")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .finish()
    }
}
