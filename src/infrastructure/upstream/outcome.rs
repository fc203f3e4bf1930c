//! # Upstream Outcomes
//!
//! Tagged result of one logical upstream call and the pure classification
//! of HTTP responses into failure kinds.
//!
//! # Examples
//!
//! ```
//! use movies_aggregator::infrastructure::upstream::outcome::{
//!     classify_status, Failure, FailureKind,
//! };
//! use reqwest::StatusCode;
//!
//! let failure = classify_status(StatusCode::NOT_FOUND, String::new());
//! assert_eq!(failure.kind(), FailureKind::EntityAbsent);
//!
//! let failure = classify_status(StatusCode::BAD_GATEWAY, "down".to_string());
//! assert_eq!(failure.kind(), FailureKind::Transient);
//! assert_eq!(failure.message(), "down");
//! ```

use reqwest::StatusCode;
use std::fmt;

/// Message used when a 404 carries no body.
const DEFAULT_ABSENT_MESSAGE: &str = "resource not found";

/// Kind of an upstream failure, used by retry allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The requested entity does not exist. A valid empty result.
    EntityAbsent,
    /// Deterministic rejection of the request by the upstream.
    ClientRejection,
    /// Upstream-internal or transport failure, presumed recoverable.
    Transient,
    /// A 2xx response whose body could not be decoded. Never recoverable.
    MalformedPayload,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntityAbsent => write!(f, "entity_absent"),
            Self::ClientRejection => write!(f, "client_rejection"),
            Self::Transient => write!(f, "transient"),
            Self::MalformedPayload => write!(f, "malformed_payload"),
        }
    }
}

/// Client-range failure reported by an upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The upstream answered 404 for the requested entity.
    EntityAbsent {
        /// Description of the missing entity.
        message: String,
    },
    /// Any other 4xx answer.
    Rejected {
        /// Upstream status code.
        status: u16,
        /// Upstream response body, verbatim.
        message: String,
    },
}

impl ClientError {
    /// Returns the upstream message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::EntityAbsent { message } | Self::Rejected { message, .. } => message,
        }
    }

    /// Returns the upstream status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::EntityAbsent { .. } => StatusCode::NOT_FOUND.as_u16(),
            Self::Rejected { status, .. } => *status,
        }
    }
}

/// Server-range or transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    /// Upstream status code, `None` for transport failures.
    pub status: Option<u16>,
    /// Upstream response body verbatim, or the transport error description.
    pub message: String,
    /// True when a successful response carried an undecodable body.
    pub malformed: bool,
}

impl ServerError {
    /// Creates a server error from an upstream status and body.
    #[must_use]
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            malformed: false,
        }
    }

    /// Creates a server error for a request that never got a response.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            malformed: false,
        }
    }

    /// Creates a server error for a successful response whose body could
    /// not be decoded.
    #[must_use]
    pub fn malformed_payload(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            malformed: true,
        }
    }

    /// Returns the failure kind.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        if self.malformed {
            FailureKind::MalformedPayload
        } else {
            FailureKind::Transient
        }
    }
}

/// A failed attempt, either client or server side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Client-range failure.
    Client(ClientError),
    /// Server-range or transport failure.
    Server(ServerError),
}

impl Failure {
    /// Returns the failure kind.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Client(ClientError::EntityAbsent { .. }) => FailureKind::EntityAbsent,
            Self::Client(ClientError::Rejected { .. }) => FailureKind::ClientRejection,
            Self::Server(e) => e.kind(),
        }
    }

    /// Returns the upstream message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Client(e) => e.message(),
            Self::Server(e) => &e.message,
        }
    }

    /// Returns the upstream status code, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client(e) => Some(e.status()),
            Self::Server(e) => e.status,
        }
    }

    /// Converts the failure back into a terminal outcome.
    #[must_use]
    pub fn into_outcome<T>(self) -> UpstreamOutcome<T> {
        match self {
            Self::Client(e) => UpstreamOutcome::ClientError(e),
            Self::Server(e) => UpstreamOutcome::ServerError(e),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            Some(status) => write!(f, "{} ({}): {}", self.kind(), status, self.message()),
            None => write!(f, "{}: {}", self.kind(), self.message()),
        }
    }
}

/// Result of one logical upstream call.
///
/// Exactly one variant applies: a payload is never paired with an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOutcome<T> {
    /// 2xx response with a decoded payload.
    Success(T),
    /// 4xx response. Not retried.
    ClientError(ClientError),
    /// 5xx response, transport failure or undecodable 2xx body.
    ServerError(ServerError),
    /// Retry budget spent on retryable failures.
    ExhaustedRetry {
        /// Total attempts issued, including the first.
        attempts: u32,
        /// The failure observed on the final attempt.
        last: Failure,
    },
}

impl<T> UpstreamOutcome<T> {
    /// Returns true for `Success`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the kind of a single-attempt failure.
    ///
    /// `None` for `Success` and for `ExhaustedRetry`, which is already terminal.
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::ClientError(ClientError::EntityAbsent { .. }) => Some(FailureKind::EntityAbsent),
            Self::ClientError(ClientError::Rejected { .. }) => Some(FailureKind::ClientRejection),
            Self::ServerError(e) => Some(e.kind()),
            Self::Success(_) | Self::ExhaustedRetry { .. } => None,
        }
    }

    /// Splits a single-attempt failure out of the outcome.
    ///
    /// # Errors
    ///
    /// Returns the outcome unchanged when it is `Success` or `ExhaustedRetry`.
    pub fn into_failure(self) -> Result<Failure, Self> {
        match self {
            Self::ClientError(e) => Ok(Failure::Client(e)),
            Self::ServerError(e) => Ok(Failure::Server(e)),
            other => Err(other),
        }
    }

    /// Maps the success payload.
    pub fn map<U, F>(self, f: F) -> UpstreamOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(value) => UpstreamOutcome::Success(f(value)),
            Self::ClientError(e) => UpstreamOutcome::ClientError(e),
            Self::ServerError(e) => UpstreamOutcome::ServerError(e),
            Self::ExhaustedRetry { attempts, last } => {
                UpstreamOutcome::ExhaustedRetry { attempts, last }
            }
        }
    }
}

/// Classifies a non-success HTTP status and its body.
///
/// - 404 becomes [`ClientError::EntityAbsent`]
/// - any other 4xx becomes [`ClientError::Rejected`] with the body verbatim
/// - everything else becomes a [`ServerError`] with the body verbatim
#[must_use]
pub fn classify_status(status: StatusCode, body: String) -> Failure {
    if status == StatusCode::NOT_FOUND {
        let message = if body.trim().is_empty() {
            DEFAULT_ABSENT_MESSAGE.to_string()
        } else {
            body
        };
        Failure::Client(ClientError::EntityAbsent { message })
    } else if status.is_client_error() {
        Failure::Client(ClientError::Rejected {
            status: status.as_u16(),
            message: body,
        })
    } else {
        Failure::Server(ServerError::with_status(status.as_u16(), body))
    }
}
