use std::time::Duration;

use async_trait::async_trait;
use cms_types::{ContentItem, ContentType, FieldMap, RecordId};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;

use crate::error::{IndexError, IndexResult};
use crate::traits::IndexStore;

/// Index store backed by rows in a remote table over a PostgREST-style API.
///
/// One table per content type, named after it, with the record's `id` as
/// primary key. The backend enforces id uniqueness (a violated key comes
/// back as 409) and performs the newest-first ordering server-side, so this
/// adapter never holds the whole collection in memory.
pub struct TableIndexStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl TableIndexStore {
    /// Create a store against `endpoint` (the REST root, no trailing slash)
    /// with the given API key. Every request is bounded by `op_timeout`.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        op_timeout: Duration,
    ) -> IndexResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(op_timeout)
            .build()
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn table_url(&self, content_type: ContentType) -> String {
        format!("{}/{}", self.endpoint, content_type)
    }

    fn auth_headers(&self) -> IndexResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&self.api_key)
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;
        headers.insert("apikey", value);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Fetch a single row by id. `Ok(None)` if no such row.
    async fn fetch_row(
        &self,
        content_type: ContentType,
        id: RecordId,
    ) -> IndexResult<Option<ContentItem>> {
        let response = self
            .client
            .get(self.table_url(content_type))
            .headers(self.auth_headers()?)
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IndexError::Unavailable(format!(
                "row fetch returned {status}"
            )));
        }
        let mut rows: Vec<ContentItem> = response
            .json()
            .await
            .map_err(|e| IndexError::Serialization(e.to_string()))?;
        Ok(rows.pop())
    }
}

#[async_trait]
impl IndexStore for TableIndexStore {
    async fn append(&self, item: &ContentItem) -> IndexResult<RecordId> {
        let response = self
            .client
            .post(self.table_url(item.content_type))
            .headers(self.auth_headers()?)
            .header("Prefer", "return=minimal")
            .json(&[item])
            .send()
            .await?;

        match response.status() {
            StatusCode::CONFLICT => Err(IndexError::DuplicateId(item.id)),
            status if status.is_success() => {
                tracing::debug!(id = %item.id, content_type = %item.content_type, "appended row");
                Ok(item.id)
            }
            status => Err(IndexError::Unavailable(format!(
                "row insert returned {status}"
            ))),
        }
    }

    async fn list_all(&self, content_type: ContentType) -> IndexResult<Vec<ContentItem>> {
        let response = self
            .client
            .get(self.table_url(content_type))
            .headers(self.auth_headers()?)
            .query(&[("order", "created_at.desc,id.desc")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IndexError::Unavailable(format!(
                "row list returned {status}"
            )));
        }
        response
            .json()
            .await
            .map_err(|e| IndexError::Serialization(e.to_string()))
    }

    async fn update(
        &self,
        content_type: ContentType,
        id: RecordId,
        patch: &FieldMap,
    ) -> IndexResult<()> {
        // Read-merge-write: the row stores the whole field map, and a patch
        // replaces named attributes while keeping the rest.
        let mut row = self
            .fetch_row(content_type, id)
            .await?
            .ok_or(IndexError::NotFound(id))?;
        row.apply_patch(patch);

        let response = self
            .client
            .patch(self.table_url(content_type))
            .headers(self.auth_headers()?)
            .header("Prefer", "return=minimal")
            .query(&[("id", format!("eq.{id}"))])
            .json(&serde_json::json!({ "fields": row.fields }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IndexError::Unavailable(format!(
                "row update returned {status}"
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for TableIndexStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // API key deliberately omitted.
        f.debug_struct("TableIndexStore")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> TableIndexStore {
        TableIndexStore::new(
            "https://db.example/rest/v1/",
            "anon-key",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn table_url_is_named_after_content_type() {
        let store = make_store();
        assert_eq!(
            store.table_url(ContentType::Placement),
            "https://db.example/rest/v1/placement"
        );
    }

    #[test]
    fn auth_headers_carry_key_and_bearer() {
        let headers = make_store().auth_headers().unwrap();
        assert_eq!(headers.get("apikey").unwrap(), "anon-key");
        assert!(headers.contains_key(reqwest::header::AUTHORIZATION));
    }

    #[test]
    fn debug_omits_api_key() {
        let rendered = format!("{:?}", make_store());
        assert!(!rendered.contains("anon-key"));
    }
}
