use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use cms_types::{BlobRef, ContentType};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{BlobError, BlobResult};
use crate::key::derive_key;
use crate::traits::BlobStore;

/// Blob store backed by a hosted git repository's contents API.
///
/// Each upload becomes one file committed to a fixed branch under
/// `{root}/{key}`. Keys carry a fresh token, so blob writes never land on an
/// existing path and no optimistic-concurrency SHA is needed for them (the
/// API only demands a SHA when replacing a file). Stored files are served
/// from the host's raw-content address.
pub struct RepoBlobStore {
    client: reqwest::Client,
    api_base: String,
    raw_base: String,
    repo: String,
    branch: String,
    root: String,
    token: String,
}

#[derive(Serialize)]
struct PutContents<'a> {
    message: String,
    content: String,
    branch: &'a str,
}

#[derive(Deserialize)]
struct GetContents {
    content: String,
}

impl RepoBlobStore {
    /// Create a store for `repo` (`owner/name`) on `branch`, committing under
    /// the `root` directory. Every request is bounded by `op_timeout`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api_base: impl Into<String>,
        raw_base: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        root: impl Into<String>,
        token: impl Into<String>,
        op_timeout: Duration,
    ) -> BlobResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(op_timeout)
            .user_agent("cms-pipeline")
            .build()
            .map_err(|e| BlobError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            raw_base: raw_base.into().trim_end_matches('/').to_string(),
            repo: repo.into(),
            branch: branch.into(),
            root: root.into().trim_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn repo_path(&self, key: &str) -> String {
        if self.root.is_empty() {
            key.to_string()
        } else {
            format!("{}/{key}", self.root)
        }
    }

    fn contents_url(&self, key: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_base,
            self.repo,
            self.repo_path(key)
        )
    }

    /// Raw-content URL for a stored key.
    pub fn raw_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.raw_base,
            self.repo,
            self.branch,
            self.repo_path(key)
        )
    }
}

#[async_trait]
impl BlobStore for RepoBlobStore {
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

        let body = PutContents {
            message: format!("upload {key}"),
            content: base64::engine::general_purpose::STANDARD.encode(bytes),
            branch: &self.branch,
        };

        let response = self
            .client
            .put(self.contents_url(&key))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlobError::Unavailable(format!(
                "repo upload for {key} returned {status}"
            )));
        }

        tracing::debug!(%key, size = bytes.len(), "committed blob to repository");
        Ok(BlobRef::new(key.clone(), self.raw_url(&key)))
    }

    async fn read(&self, key: &str) -> BlobResult<Vec<u8>> {
        let response = self
            .client
            .get(self.contents_url(key))
            .bearer_auth(&self.token)
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(BlobError::NotFound(key.to_string())),
            status if status.is_success() => {
                let contents: GetContents = response
                    .json()
                    .await
                    .map_err(|e| BlobError::Unavailable(e.to_string()))?;
                // The API wraps base64 payloads at 60 columns.
                let compact: String = contents
                    .content
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                base64::engine::general_purpose::STANDARD
                    .decode(compact)
                    .map_err(|e| {
                        BlobError::Unavailable(format!("undecodable payload for {key}: {e}"))
                    })
            }
            status => Err(BlobError::Unavailable(format!(
                "repo read for {key} returned {status}"
            ))),
        }
    }
}

impl std::fmt::Debug for RepoBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token deliberately omitted.
        f.debug_struct("RepoBlobStore")
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> RepoBlobStore {
        RepoBlobStore::new(
            "https://api.example.com",
            "https://raw.example.com",
            "dept/site-data",
            "main",
            "/uploads/",
            "ghp-token",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn contents_url_includes_root() {
        let store = make_store();
        assert_eq!(
            store.contents_url("gallery/x.jpg"),
            "https://api.example.com/repos/dept/site-data/contents/uploads/gallery/x.jpg"
        );
    }

    #[test]
    fn raw_url_pins_the_branch() {
        let store = make_store();
        assert_eq!(
            store.raw_url("gallery/x.jpg"),
            "https://raw.example.com/dept/site-data/main/uploads/gallery/x.jpg"
        );
    }

    #[test]
    fn empty_root_omits_prefix() {
        let store = RepoBlobStore::new(
            "https://api.example.com",
            "https://raw.example.com",
            "dept/site-data",
            "main",
            "",
            "t",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(store.repo_path("a/b.jpg"), "a/b.jpg");
    }

    #[test]
    fn debug_omits_token() {
        let rendered = format!("{:?}", make_store());
        assert!(!rendered.contains("ghp-token"));
    }

    #[tokio::test]
    async fn empty_upload_rejected_before_any_request() {
        let store = make_store();
        let err = store
            .store(ContentType::Gallery, b"", "a.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::EmptyBlob));
    }
}
