//! # REST API
//!
//! REST endpoints using axum.
//!
//! # Endpoints
//!
//! - `GET /v1/movies/{id}` - Movie info with its reviews
//! - `GET /aggregate/{id}` - Alias of the above
//! - `GET /health` - Health check endpoint
//!
//! # Error Mapping
//!
//! | Upstream outcome        | Status                      |
//! |-------------------------|-----------------------------|
//! | Movie not found         | `200` with an empty movie   |
//! | Client rejection        | upstream status             |
//! | Server error            | upstream 5xx, else `502`    |
//! | Malformed 2xx payload   | `502`                       |
//! | Retries exhausted       | `503`                       |
//! | Aggregation deadline    | `504`                       |
//!
//! Failure bodies are an [`ErrorResponse`] carrying the upstream message
//! verbatim. The failing service and the attempt count are also sent in the
//! `x-upstream-service` and `x-upstream-attempts` headers.
//!
//! # Usage
//!
//! ```ignore
//! use movies_aggregator::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState::new(service));
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8082").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, ErrorResponse, HealthResponse, UPSTREAM_ATTEMPTS_HEADER,
    UPSTREAM_SERVICE_HEADER,
};
pub use routes::create_router;
