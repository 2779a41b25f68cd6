use tokio::net::TcpListener;

use crate::bootstrap::build_state;
use crate::config::Config;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// The CMS content server.
pub struct CmsServer {
    config: Config,
}

impl CmsServer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the router with freshly constructed adapters (useful for
    /// in-process testing with `tower::ServiceExt`).
    pub fn router(&self) -> ServerResult<axum::Router> {
        let state = build_state(&self.config)?;
        Ok(build_router(state))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router()?;
        let listener = TcpListener::bind(&self.config.server.bind_addr).await?;
        tracing::info!("CMS server listening on {}", self.config.server.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
