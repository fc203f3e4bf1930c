//! # REST Handlers
//!
//! Request handlers for the aggregator's REST API.

use crate::application::error::AggregationError;
use crate::application::services::MovieAggregationService;
use crate::domain::entities::Movie;
use crate::domain::value_objects::MovieInfoId;
use crate::infrastructure::upstream::UpstreamError;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Header naming the upstream service a failure came from.
pub const UPSTREAM_SERVICE_HEADER: &str = "x-upstream-service";

/// Header carrying the number of attempts made before giving up.
pub const UPSTREAM_ATTEMPTS_HEADER: &str = "x-upstream-attempts";

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Movie aggregation service.
    pub aggregation: MovieAggregationService,
}

impl AppState {
    /// Creates the state around an aggregation service.
    #[must_use]
    pub fn new(aggregation: MovieAggregationService) -> Self {
        Self { aggregation }
    }
}

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Upstream message, verbatim.
    pub message: String,
    /// Upstream service involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Attempts spent before giving up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

/// Error surfaced to REST callers as an [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError(AggregationError);

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            AggregationError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AggregationError::Upstream(e) => upstream_status(e),
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match &self.0 {
            AggregationError::Timeout { .. } => "timeout",
            AggregationError::Upstream(e) => match e {
                UpstreamError::EntityAbsent { .. } => "entity_absent",
                UpstreamError::ClientRejection { .. } => "client_rejection",
                UpstreamError::Transient { .. } => "upstream_error",
                UpstreamError::MalformedPayload { .. } => "malformed_payload",
                UpstreamError::RetryExhausted { .. } => "retry_exhausted",
            },
        }
    }

    /// Builds the response body.
    #[must_use]
    pub fn to_response_body(&self) -> ErrorResponse {
        let (message, attempts) = match &self.0 {
            AggregationError::Upstream(e) => (e.message().to_string(), e.attempts()),
            timeout @ AggregationError::Timeout { .. } => (timeout.to_string(), None),
        };
        ErrorResponse {
            error: self.code().to_string(),
            message,
            service: self.0.service().map(str::to_string),
            attempts,
        }
    }

    /// Returns the wrapped aggregation error.
    #[must_use]
    pub fn inner(&self) -> &AggregationError {
        &self.0
    }
}

impl From<AggregationError> for ApiError {
    fn from(err: AggregationError) -> Self {
        Self(err)
    }
}

fn upstream_status(err: &UpstreamError) -> StatusCode {
    match err {
        UpstreamError::EntityAbsent { .. } => StatusCode::NOT_FOUND,
        UpstreamError::ClientRejection { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
        }
        UpstreamError::Transient { status, .. } => status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .filter(StatusCode::is_server_error)
            .unwrap_or(StatusCode::BAD_GATEWAY),
        UpstreamError::MalformedPayload { .. } => StatusCode::BAD_GATEWAY,
        UpstreamError::RetryExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_response_body();

        let mut headers = HeaderMap::new();
        if let Some(value) = body
            .service
            .as_deref()
            .and_then(|s| HeaderValue::from_str(s).ok())
        {
            headers.insert(UPSTREAM_SERVICE_HEADER, value);
        }
        if let Some(attempts) = body.attempts {
            headers.insert(UPSTREAM_ATTEMPTS_HEADER, HeaderValue::from(attempts));
        }

        warn!(status = status.as_u16(), error = %self.0, "request failed");
        (status, headers, Json(body)).into_response()
    }
}

/// Health check endpoint.
///
/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP".to_string(),
    })
}

/// Returns a movie with its reviews.
///
/// `GET /v1/movies/{id}`
///
/// An unknown id yields `200` with an empty movie.
///
/// # Errors
///
/// Returns `ApiError` if an upstream call fails terminally or the
/// aggregation deadline expires.
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    let movie = state
        .aggregation
        .get_movie(&MovieInfoId::new(id))
        .await?;
    Ok(Json(movie))
}
