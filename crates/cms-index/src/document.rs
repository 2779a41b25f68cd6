use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};

/// Opaque optimistic-concurrency token for a stored document.
///
/// The token changes whenever the document's content changes. A writer
/// presents the token it loaded; a mismatch at save time means another
/// writer got there first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocVersion(String);

impl DocVersion {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Content-hash token used by the in-memory backend.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(blake3::hash(bytes).as_bytes()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Versioned whole-document storage underneath [`CollectionIndexStore`].
///
/// `load` returns the current bytes and their version token; `save` writes
/// the whole document, succeeding only if `expected` still names the current
/// version (`None` meaning "the document must not exist yet"). A mismatch is
/// [`IndexError::StaleWrite`].
///
/// [`CollectionIndexStore`]: crate::collection::CollectionIndexStore
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document. `Ok(None)` if it does not exist yet.
    async fn load(&self, path: &str) -> IndexResult<Option<(Vec<u8>, DocVersion)>>;

    /// Replace a document wholesale, guarded by the expected version.
    async fn save(
        &self,
        path: &str,
        bytes: &[u8],
        expected: Option<&DocVersion>,
    ) -> IndexResult<DocVersion>;
}

// ---------------------------------------------------------------------------
// InMemoryDocumentStore
// ---------------------------------------------------------------------------

/// In-memory document store with BLAKE3 content-hash version tokens.
///
/// Intended for tests and embedding. The compare-and-swap in `save` is
/// atomic under the write lock, so it exhibits the same stale-write behavior
/// as a remote backend under concurrent writers.
pub struct InMemoryDocumentStore {
    docs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.docs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.docs.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self, path: &str) -> IndexResult<Option<(Vec<u8>, DocVersion)>> {
        let docs = self.docs.read().expect("lock poisoned");
        Ok(docs
            .get(path)
            .map(|bytes| (bytes.clone(), DocVersion::of_bytes(bytes))))
    }

    async fn save(
        &self,
        path: &str,
        bytes: &[u8],
        expected: Option<&DocVersion>,
    ) -> IndexResult<DocVersion> {
        let mut docs = self.docs.write().expect("lock poisoned");
        let current = docs.get(path).map(|b| DocVersion::of_bytes(b));

        match (expected, &current) {
            (None, None) => {}
            (Some(exp), Some(cur)) if exp == cur => {}
            _ => return Err(IndexError::StaleWrite),
        }

        docs.insert(path.to_string(), bytes.to_vec());
        Ok(DocVersion::of_bytes(bytes))
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("doc_count", &self.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// RepoDocumentStore
// ---------------------------------------------------------------------------

/// Document store backed by a hosted git repository's contents API.
///
/// The version token is the backend's blob SHA: fetched with every load,
/// presented with every save. The API rejects a save carrying an outdated
/// SHA, which maps to [`IndexError::StaleWrite`] and drives the caller's
/// re-fetch-and-retry loop.
pub struct RepoDocumentStore {
    client: reqwest::Client,
    api_base: String,
    repo: String,
    branch: String,
    token: String,
}

#[derive(Serialize)]
struct PutContents<'a> {
    message: String,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Deserialize)]
struct GetContents {
    content: String,
    sha: String,
}

impl RepoDocumentStore {
    /// Create a store for `repo` (`owner/name`) on `branch`. Every request
    /// is bounded by `op_timeout`.
    pub fn new(
        api_base: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        token: impl Into<String>,
        op_timeout: Duration,
    ) -> IndexResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(op_timeout)
            .user_agent("cms-pipeline")
            .build()
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            repo: repo.into(),
            branch: branch.into(),
            token: token.into(),
        })
    }

    fn contents_url(&self, path: &str) -> String {
        format!("{}/repos/{}/contents/{path}", self.api_base, self.repo)
    }
}

#[async_trait]
impl DocumentStore for RepoDocumentStore {
    async fn load(&self, path: &str) -> IndexResult<Option<(Vec<u8>, DocVersion)>> {
        let response = self
            .client
            .get(self.contents_url(path))
            .bearer_auth(&self.token)
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let contents: GetContents = response
                    .json()
                    .await
                    .map_err(|e| IndexError::Unavailable(e.to_string()))?;
                // The API wraps base64 payloads at 60 columns.
                let compact: String = contents
                    .content
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(compact)
                    .map_err(|e| {
                        IndexError::Serialization(format!("undecodable document {path}: {e}"))
                    })?;
                Ok(Some((bytes, DocVersion::new(contents.sha))))
            }
            status => Err(IndexError::Unavailable(format!(
                "document load for {path} returned {status}"
            ))),
        }
    }

    async fn save(
        &self,
        path: &str,
        bytes: &[u8],
        expected: Option<&DocVersion>,
    ) -> IndexResult<DocVersion> {
        let body = PutContents {
            message: format!("update {path}"),
            content: base64::engine::general_purpose::STANDARD.encode(bytes),
            branch: &self.branch,
            sha: expected.map(DocVersion::as_str),
        };

        let response = self
            .client
            .put(self.contents_url(path))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            // An outdated SHA comes back as 409.
            StatusCode::CONFLICT => Err(IndexError::StaleWrite),
            // 422 covers both a SHA mismatch and plain bad requests
            // (nonexistent branch, malformed payload); only the former is
            // a concurrent write worth retrying.
            StatusCode::UNPROCESSABLE_ENTITY => {
                let detail = response.text().await.unwrap_or_default();
                Err(classify_unprocessable(path, &detail))
            }
            status if status.is_success() => {
                #[derive(Deserialize)]
                struct PutResponse {
                    content: PutContent,
                }
                #[derive(Deserialize)]
                struct PutContent {
                    sha: String,
                }
                let put: PutResponse = response
                    .json()
                    .await
                    .map_err(|e| IndexError::Unavailable(e.to_string()))?;
                Ok(DocVersion::new(put.content.sha))
            }
            status => Err(IndexError::Unavailable(format!(
                "document save for {path} returned {status}"
            ))),
        }
    }
}

/// Sort a 422 from the contents API into stale-write versus terminal.
///
/// The mismatch response names the rejected `sha`; messages for other 422s
/// (unknown branch, malformed payload) do not.
fn classify_unprocessable(path: &str, detail: &str) -> IndexError {
    if detail.to_ascii_lowercase().contains("sha") {
        IndexError::StaleWrite
    } else {
        IndexError::Unavailable(format!("document save for {path} returned 422: {detail}"))
    }
}

impl std::fmt::Debug for RepoDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token deliberately omitted.
        f.debug_struct("RepoDocumentStore")
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .finish()
    }
}
