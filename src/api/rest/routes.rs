//! # REST Routes
//!
//! Router construction for the aggregator's REST API.

use crate::api::rest::handlers::{self, AppState};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Creates the REST router.
///
/// # Routes
///
/// - `GET /v1/movies/{id}`
/// - `GET /aggregate/{id}` (alias)
/// - `GET /health`
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/movies/{id}", get(handlers::get_movie))
        .route("/aggregate/{id}", get(handlers::get_movie))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
