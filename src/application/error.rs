//! # Application Errors
//!
//! Error types for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! AggregationError
//! ├── Upstream(UpstreamError)  - Terminal upstream failure, propagated unchanged
//! └── Timeout                  - Aggregation deadline expired
//! ```
//!
//! # Examples
//!
//! ```
//! use movies_aggregator::application::error::AggregationError;
//! use movies_aggregator::infrastructure::upstream::UpstreamError;
//!
//! let err: AggregationError = UpstreamError::transient("movies-info", Some(500), "down").into();
//! assert_eq!(err.upstream().map(|e| e.service()), Some("movies-info"));
//!
//! let err = AggregationError::timeout(30_000, "movies-review");
//! assert!(err.to_string().contains("30000"));
//! assert_eq!(err.service(), Some("movies-review"));
//! ```

use crate::infrastructure::upstream::UpstreamError;
use thiserror::Error;

/// Error returned by the movie aggregation service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// An upstream call ended in a terminal failure.
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// The aggregation did not finish before its deadline.
    #[error("aggregation timed out after {timeout_ms}ms waiting for {service}")]
    Timeout {
        /// Deadline in milliseconds.
        timeout_ms: u64,
        /// Upstream call in flight when the deadline expired.
        service: String,
    },
}

impl AggregationError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(timeout_ms: u64, service: impl Into<String>) -> Self {
        Self::Timeout {
            timeout_ms,
            service: service.into(),
        }
    }

    /// Returns the upstream service involved in the failure.
    #[must_use]
    pub fn service(&self) -> Option<&str> {
        match self {
            Self::Upstream(e) => Some(e.service()),
            Self::Timeout { service, .. } => Some(service),
        }
    }

    /// Returns the upstream error, if any.
    #[must_use]
    pub fn upstream(&self) -> Option<&UpstreamError> {
        match self {
            Self::Upstream(e) => Some(e),
            Self::Timeout { .. } => None,
        }
    }

    /// Returns true if this error was caused by the request itself.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.upstream().is_some_and(UpstreamError::is_client_error)
    }
}

/// Result type for aggregation operations.
pub type AggregationResult<T> = Result<T, AggregationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_wraps_upstream_message() {
        let err =
            AggregationError::from(UpstreamError::client_rejection("movies-info", 400, "bad id"));
        let display = err.to_string();
        assert!(display.contains("movies-info"));
        assert!(display.contains("bad id"));
        assert!(err.is_client_error());
    }

    #[test]
    fn timeout_has_no_upstream() {
        let err = AggregationError::timeout(100, "movies-info");
        assert!(err.upstream().is_none());
        assert_eq!(err.service(), Some("movies-info"));
        assert!(err.to_string().contains("movies-info"));
        assert!(!err.is_client_error());
    }
}
