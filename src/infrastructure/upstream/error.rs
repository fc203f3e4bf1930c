//! # Upstream Errors
//!
//! Terminal failure taxonomy of upstream calls.
//!
//! An [`UpstreamOutcome`] that is not a success becomes an [`UpstreamError`]
//! tagged with the name of the upstream that produced it. The upstream status
//! and message are kept verbatim so the boundary can reconstruct the failure.
//!
//! # Examples
//!
//! ```
//! use movies_aggregator::infrastructure::upstream::error::UpstreamError;
//!
//! let error = UpstreamError::transient("movies-info", Some(500), "Unavailable");
//! assert!(error.is_retryable());
//! assert_eq!(error.message(), "Unavailable");
//!
//! let error = UpstreamError::client_rejection("movies-info", 400, "bad id");
//! assert!(error.is_client_error());
//! assert!(!error.is_retryable());
//! ```

use crate::infrastructure::upstream::outcome::{ClientError, Failure, UpstreamOutcome};
use thiserror::Error;

/// Terminal failure of a call to one upstream service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The requested entity does not exist upstream.
    #[error("{service} entity absent: {message}")]
    EntityAbsent {
        /// Upstream service name.
        service: String,
        /// Error message.
        message: String,
    },

    /// The upstream deterministically rejected the request.
    #[error("{service} rejected request ({status}): {message}")]
    ClientRejection {
        /// Upstream service name.
        service: String,
        /// Upstream status code.
        status: u16,
        /// Upstream response body.
        message: String,
    },

    /// Upstream-internal or transport failure that was not retried.
    #[error("{service} transient failure: {message}")]
    Transient {
        /// Upstream service name.
        service: String,
        /// Upstream status code, `None` for transport failures.
        status: Option<u16>,
        /// Upstream response body or transport error.
        message: String,
    },

    /// The upstream answered 2xx with a body that could not be decoded.
    #[error("{service} returned a malformed payload: {message}")]
    MalformedPayload {
        /// Upstream service name.
        service: String,
        /// Upstream status code.
        status: Option<u16>,
        /// Decode error description.
        message: String,
    },

    /// Retryable failures persisted through the whole retry budget.
    #[error("{service} failed after {attempts} attempts: {last}")]
    RetryExhausted {
        /// Upstream service name.
        service: String,
        /// Total attempts issued.
        attempts: u32,
        /// Failure observed on the final attempt.
        last: Failure,
    },
}

impl UpstreamError {
    /// Creates an entity absent error.
    #[must_use]
    pub fn entity_absent(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EntityAbsent {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Creates a client rejection error.
    #[must_use]
    pub fn client_rejection(
        service: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::ClientRejection {
            service: service.into(),
            status,
            message: message.into(),
        }
    }

    /// Creates a transient error.
    #[must_use]
    pub fn transient(
        service: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Transient {
            service: service.into(),
            status,
            message: message.into(),
        }
    }

    /// Creates a malformed payload error.
    #[must_use]
    pub fn malformed_payload(
        service: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedPayload {
            service: service.into(),
            status,
            message: message.into(),
        }
    }

    /// Creates a retry exhausted error.
    #[must_use]
    pub fn retry_exhausted(service: impl Into<String>, attempts: u32, last: Failure) -> Self {
        Self::RetryExhausted {
            service: service.into(),
            attempts,
            last,
        }
    }

    /// Builds the error for a terminal single-attempt failure.
    #[must_use]
    pub fn from_failure(service: impl Into<String>, failure: Failure) -> Self {
        match failure {
            Failure::Client(ClientError::EntityAbsent { message }) => {
                Self::entity_absent(service, message)
            }
            Failure::Client(ClientError::Rejected { status, message }) => {
                Self::client_rejection(service, status, message)
            }
            Failure::Server(e) if e.malformed => {
                Self::malformed_payload(service, e.status, e.message)
            }
            Failure::Server(e) => Self::transient(service, e.status, e.message),
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Returns true if this error was caused by the request itself.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ClientRejection { .. } | Self::EntityAbsent { .. })
    }

    /// Returns true if the entity does not exist upstream.
    #[must_use]
    pub fn is_entity_absent(&self) -> bool {
        matches!(self, Self::EntityAbsent { .. })
    }

    /// Returns the name of the upstream that failed.
    #[must_use]
    pub fn service(&self) -> &str {
        match self {
            Self::EntityAbsent { service, .. }
            | Self::ClientRejection { service, .. }
            | Self::Transient { service, .. }
            | Self::MalformedPayload { service, .. }
            | Self::RetryExhausted { service, .. } => service,
        }
    }

    /// Returns the upstream message verbatim.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::EntityAbsent { message, .. }
            | Self::ClientRejection { message, .. }
            | Self::Transient { message, .. }
            | Self::MalformedPayload { message, .. } => message,
            Self::RetryExhausted { last, .. } => last.message(),
        }
    }

    /// Returns the upstream status code, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::EntityAbsent { .. } => Some(404),
            Self::ClientRejection { status, .. } => Some(*status),
            Self::Transient { status, .. } | Self::MalformedPayload { status, .. } => *status,
            Self::RetryExhausted { last, .. } => last.status(),
        }
    }

    /// Returns the number of attempts spent, for exhausted retries.
    #[must_use]
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::RetryExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

impl<T> UpstreamOutcome<T> {
    /// Converts the outcome into a result tagged with the upstream name.
    ///
    /// # Errors
    ///
    /// Returns the matching [`UpstreamError`] for every non-success outcome.
    pub fn into_result(self, service: &str) -> UpstreamResult<T> {
        match self {
            Self::Success(value) => Ok(value),
            Self::ClientError(e) => Err(UpstreamError::from_failure(service, Failure::Client(e))),
            Self::ServerError(e) => Err(UpstreamError::from_failure(service, Failure::Server(e))),
            Self::ExhaustedRetry { attempts, last } => {
                Err(UpstreamError::retry_exhausted(service, attempts, last))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::upstream::outcome::ServerError;

    #[test]
    fn transient_is_retryable() {
        let error = UpstreamError::transient("movies-info", None, "connection refused");
        assert!(error.is_retryable());
        assert!(!error.is_client_error());
        assert_eq!(error.status(), None);
    }

    #[test]
    fn exhausted_is_terminal() {
        let last = Failure::Server(ServerError::with_status(500, "MoviesInfoService Unavailable"));
        let error = UpstreamError::retry_exhausted("movies-info", 4, last);
        assert!(!error.is_retryable());
        assert_eq!(error.attempts(), Some(4));
        assert_eq!(error.status(), Some(500));
        assert_eq!(error.message(), "MoviesInfoService Unavailable");
    }

    #[test]
    fn malformed_server_failure_is_not_retryable() {
        let failure = Failure::Server(ServerError::malformed_payload(200, "bad date"));
        let error = UpstreamError::from_failure("movies-info", failure);
        assert_eq!(
            error,
            UpstreamError::malformed_payload("movies-info", Some(200), "bad date")
        );
        assert!(!error.is_retryable());
        assert!(!error.is_client_error());
        assert_eq!(error.status(), Some(200));
        assert_eq!(error.message(), "bad date");
    }

    #[test]
    fn entity_absent_is_client_error() {
        let error = UpstreamError::entity_absent("movies-info", "no movie");
        assert!(error.is_client_error());
        assert!(error.is_entity_absent());
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn outcome_into_result() {
        let outcome = UpstreamOutcome::Success("payload");
        assert_eq!(outcome.into_result("movies-info"), Ok("payload"));

        let outcome: UpstreamOutcome<()> = UpstreamOutcome::ClientError(ClientError::Rejected {
            status: 400,
            message: "bad".to_string(),
        });
        assert_eq!(
            outcome.into_result("movies-review"),
            Err(UpstreamError::client_rejection("movies-review", 400, "bad"))
        );
    }

    #[test]
    fn display_names_service_and_attempts() {
        let last = Failure::Server(ServerError::with_status(503, "down"));
        let display = UpstreamError::retry_exhausted("movies-review", 4, last).to_string();
        assert!(display.contains("movies-review"));
        assert!(display.contains("4 attempts"));
        assert!(display.contains("down"));
    }
}
