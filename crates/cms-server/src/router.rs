use axum::routing::{get, patch};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::bootstrap::AppState;
use crate::handler;

/// Build the axum router with all content endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route(
            "/v1/content/:content_type",
            get(handler::list_handler).post(handler::create_handler),
        )
        .route(
            "/v1/content/:content_type/:id",
            patch(handler::update_handler),
        )
        .layer(TraceLayer::new_for_http())
        // The public site and the admin panel are served from other origins.
        .layer(CorsLayer::permissive())
        .with_state(state)
}
