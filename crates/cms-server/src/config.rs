use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Top-level configuration, loaded from TOML with environment overrides for
/// secrets. [`Config::validate`] runs at startup so a misconfigured remote
/// backend fails fast instead of on the first request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub blob: BlobConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Bound applied to every remote blob/index operation, in seconds.
    pub op_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().expect("static addr"),
            op_timeout_secs: 5,
        }
    }
}

impl ServerConfig {
    pub fn op_timeout(&self) -> Duration {
        Duration::from_secs(self.op_timeout_secs)
    }
}

/// Blob backend selection. `memory` needs no credentials and exists for
/// tests and local development.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum BlobConfig {
    Memory,
    Bucket {
        endpoint: String,
        bucket: String,
        #[serde(default)]
        access_key: String,
    },
    Repo {
        api_base: String,
        raw_base: String,
        repo: String,
        branch: String,
        #[serde(default)]
        root: String,
        #[serde(default)]
        token: String,
    },
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self::Memory
    }
}

/// Index backend selection.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum IndexConfig {
    Memory,
    Table {
        endpoint: String,
        #[serde(default)]
        api_key: String,
    },
    Collection {
        api_base: String,
        repo: String,
        branch: String,
        #[serde(default)]
        token: String,
    },
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::Memory
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 50,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> cms_publish::RetryPolicy {
        cms_publish::RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

impl Config {
    /// Load from a TOML file and apply environment overrides for secrets.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = toml::from_str(&raw)
            .map_err(|e| ServerError::Config(format!("invalid config: {e}")))?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Fill secrets from the environment, overriding file values. Keeps
    /// tokens out of checked-in configuration.
    pub fn apply_env(&mut self) {
        match &mut self.blob {
            BlobConfig::Bucket { access_key, .. } => {
                if let Ok(v) = std::env::var("CMS_BLOB_ACCESS_KEY") {
                    *access_key = v;
                }
            }
            BlobConfig::Repo { token, .. } => {
                if let Ok(v) = std::env::var("CMS_BLOB_TOKEN") {
                    *token = v;
                }
            }
            BlobConfig::Memory => {}
        }
        match &mut self.index {
            IndexConfig::Table { api_key, .. } => {
                if let Ok(v) = std::env::var("CMS_INDEX_API_KEY") {
                    *api_key = v;
                }
            }
            IndexConfig::Collection { token, .. } => {
                if let Ok(v) = std::env::var("CMS_INDEX_TOKEN") {
                    *token = v;
                }
            }
            IndexConfig::Memory => {}
        }
    }

    /// Reject configurations whose selected backends lack credentials or
    /// endpoints. Called at startup, before any request is served.
    pub fn validate(&self) -> ServerResult<()> {
        match &self.blob {
            BlobConfig::Memory => {}
            BlobConfig::Bucket {
                endpoint,
                bucket,
                access_key,
            } => {
                require("blob.endpoint", endpoint)?;
                require("blob.bucket", bucket)?;
                require("blob.access_key", access_key)?;
            }
            BlobConfig::Repo {
                api_base,
                raw_base,
                repo,
                branch,
                token,
                ..
            } => {
                require("blob.api_base", api_base)?;
                require("blob.raw_base", raw_base)?;
                require("blob.repo", repo)?;
                require("blob.branch", branch)?;
                require("blob.token", token)?;
            }
        }
        match &self.index {
            IndexConfig::Memory => {}
            IndexConfig::Table { endpoint, api_key } => {
                require("index.endpoint", endpoint)?;
                require("index.api_key", api_key)?;
            }
            IndexConfig::Collection {
                api_base,
                repo,
                branch,
                token,
            } => {
                require("index.api_base", api_base)?;
                require("index.repo", repo)?;
                require("index.branch", branch)?;
                require("index.token", token)?;
            }
        }
        if self.retry.max_attempts == 0 {
            return Err(ServerError::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn require(name: &str, value: &str) -> ServerResult<()> {
    if value.trim().is_empty() {
        Err(ServerError::Config(format!("{name} is required but empty")))
    } else {
        Ok(())
    }
}
