use std::sync::Arc;

use cms_blob::{BlobStore, BucketBlobStore, InMemoryBlobStore, RepoBlobStore};
use cms_index::{
    CollectionIndexStore, DocumentStore, IndexStore, InMemoryIndexStore, RepoDocumentStore,
    TableIndexStore,
};
use cms_publish::Publisher;

use crate::config::{BlobConfig, Config, IndexConfig};
use crate::error::ServerResult;

/// Shared request state: the publisher plus a direct index handle for the
/// read endpoint.
#[derive(Clone)]
pub struct AppState {
    pub publisher: Arc<Publisher>,
    pub index: Arc<dyn IndexStore>,
}

/// Construct the configured adapters and the publisher.
///
/// Runs once at startup; configuration has already been validated, so any
/// failure here is a backend construction problem, not missing credentials.
pub fn build_state(config: &Config) -> ServerResult<AppState> {
    let op_timeout = config.server.op_timeout();

    let blob: Arc<dyn BlobStore> = match &config.blob {
        BlobConfig::Memory => Arc::new(InMemoryBlobStore::new()),
        BlobConfig::Bucket {
            endpoint,
            bucket,
            access_key,
        } => Arc::new(BucketBlobStore::new(
            endpoint.clone(),
            bucket.clone(),
            access_key.clone(),
            op_timeout,
        )?),
        BlobConfig::Repo {
            api_base,
            raw_base,
            repo,
            branch,
            root,
            token,
        } => Arc::new(RepoBlobStore::new(
            api_base.clone(),
            raw_base.clone(),
            repo.clone(),
            branch.clone(),
            root.clone(),
            token.clone(),
            op_timeout,
        )?),
    };

    let index: Arc<dyn IndexStore> = match &config.index {
        IndexConfig::Memory => Arc::new(InMemoryIndexStore::new()),
        IndexConfig::Table { endpoint, api_key } => Arc::new(TableIndexStore::new(
            endpoint.clone(),
            api_key.clone(),
            op_timeout,
        )?),
        IndexConfig::Collection {
            api_base,
            repo,
            branch,
            token,
        } => {
            let docs: Arc<dyn DocumentStore> = Arc::new(RepoDocumentStore::new(
                api_base.clone(),
                repo.clone(),
                branch.clone(),
                token.clone(),
                op_timeout,
            )?);
            Arc::new(CollectionIndexStore::new(docs))
        }
    };

    let publisher =
        Publisher::new(Arc::clone(&blob), Arc::clone(&index)).with_retry(config.retry.policy());

    tracing::info!(
        blob = ?config.blob_kind(),
        index = ?config.index_kind(),
        "pipeline adapters constructed"
    );

    Ok(AppState {
        publisher: Arc::new(publisher),
        index,
    })
}

impl Config {
    fn blob_kind(&self) -> &'static str {
        match self.blob {
            BlobConfig::Memory => "memory",
            BlobConfig::Bucket { .. } => "bucket",
            BlobConfig::Repo { .. } => "repo",
        }
    }

    fn index_kind(&self) -> &'static str {
        match self.index {
            IndexConfig::Memory => "memory",
            IndexConfig::Table { .. } => "table",
            IndexConfig::Collection { .. } => "collection",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backends_build_without_credentials() {
        let state = build_state(&Config::default()).unwrap();
        // A usable publisher came out of it.
        let _ = Arc::clone(&state.publisher);
    }

    #[test]
    fn remote_backends_build_from_validated_config() {
        let raw = r#"
            [blob]
            backend = "bucket"
            endpoint = "https://store.example/storage/v1"
            bucket = "site-media"
            access_key = "k"

            [index]
            backend = "collection"
            api_base = "https://api.example.com"
            repo = "dept/site-data"
            branch = "main"
            token = "t"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        config.validate().unwrap();
        build_state(&config).unwrap();
    }
}
