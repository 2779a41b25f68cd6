//! HTTP surface for the CMS publish pipeline.
//!
//! Exposes the admin content API (create, update) and the read endpoint
//! views consume (list, newest first). The UI itself — forms, modals,
//! theming — is an external collaborator; this crate only accepts its
//! submissions and renders pipeline results as JSON.
//!
//! Backends are chosen in configuration and constructed once at startup;
//! missing credentials for a selected remote backend abort startup rather
//! than failing on the first request.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use bootstrap::build_state;
pub use config::{BlobConfig, Config, IndexConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::CmsServer;
