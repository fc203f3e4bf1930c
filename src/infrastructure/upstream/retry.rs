//! # Retry Policy
//!
//! Bounded retry with fixed or generated backoff, driven by an allow-list of
//! failure kinds.
//!
//! A [`RetrySpec`] is built once at startup and shared read-only between all
//! upstream clients. Attempt counters live inside each [`RetrySpec::execute`]
//! call, so concurrent calls never share state.
//!
//! # Examples
//!
//! ```
//! use movies_aggregator::infrastructure::upstream::outcome::{ServerError, UpstreamOutcome};
//! use movies_aggregator::infrastructure::upstream::retry::RetrySpec;
//! use std::time::Duration;
//!
//! let spec = RetrySpec::fixed_delay(3, Duration::from_secs(1));
//! assert_eq!(spec.total_attempts(), 4);
//! assert_eq!(spec.delay_before(2), Duration::from_secs(1));
//!
//! let failed: UpstreamOutcome<()> = UpstreamOutcome::ServerError(ServerError::transport("reset"));
//! assert!(spec.should_retry(&failed, 1));
//! assert!(!spec.should_retry(&failed, 4));
//! ```

use crate::infrastructure::upstream::outcome::{FailureKind, UpstreamOutcome};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default fixed delay between attempts in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// Delay schedule between attempts.
#[derive(Clone)]
pub enum Backoff {
    /// Constant delay before every retry.
    Fixed(Duration),
    /// Delay computed from the 1-based retry number.
    Generated(Arc<dyn Fn(u32) -> Duration + Send + Sync>),
}

impl Backoff {
    /// Creates a fixed backoff.
    #[must_use]
    pub fn fixed(delay: Duration) -> Self {
        Self::Fixed(delay)
    }

    /// Creates a backoff from a generator over the retry number.
    #[must_use]
    pub fn generated<F>(generator: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Self::Generated(Arc::new(generator))
    }

    /// Returns the delay before the given retry (1 = first retry).
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::Generated(generator) => generator(retry),
        }
    }
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(delay) => f.debug_tuple("Fixed").field(delay).finish(),
            Self::Generated(_) => f.debug_tuple("Generated").field(&"<fn>").finish(),
        }
    }
}

/// Immutable retry configuration shared by upstream clients.
///
/// # Invariants
///
/// - Total attempts issued for one call never exceed `1 + max_attempts`.
/// - [`FailureKind::EntityAbsent`] and [`FailureKind::MalformedPayload`] are
///   never retryable.
#[derive(Debug, Clone)]
pub struct RetrySpec {
    /// Retries allowed after the first attempt.
    max_attempts: u32,
    /// Delay schedule between attempts.
    backoff: Backoff,
    /// Failure kinds eligible for retry.
    retry_on: Vec<FailureKind>,
}

impl Default for RetrySpec {
    fn default() -> Self {
        Self::fixed_delay(
            DEFAULT_MAX_ATTEMPTS,
            Duration::from_millis(DEFAULT_DELAY_MS),
        )
    }
}

impl RetrySpec {
    /// Creates a fixed-delay policy retrying transient failures only.
    #[must_use]
    pub fn fixed_delay(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::fixed(delay),
            retry_on: vec![FailureKind::Transient],
        }
    }

    /// Creates a policy that issues exactly one attempt.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::fixed_delay(0, Duration::ZERO)
    }

    /// Replaces the backoff schedule.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replaces the retryable failure kinds.
    ///
    /// Kinds that are never retryable are dropped from the list.
    #[must_use]
    pub fn retry_on(mut self, kinds: impl IntoIterator<Item = FailureKind>) -> Self {
        self.retry_on = kinds
            .into_iter()
            .filter(|kind| !Self::never_retried(*kind))
            .collect();
        self
    }

    /// Returns the retries allowed after the first attempt.
    #[inline]
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the total attempts one call may issue.
    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.max_attempts.saturating_add(1)
    }

    /// Returns the backoff schedule.
    #[must_use]
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Returns true if failures of this kind may be retried.
    #[must_use]
    pub fn is_retryable(&self, kind: FailureKind) -> bool {
        !Self::never_retried(kind) && self.retry_on.contains(&kind)
    }

    /// An absent entity or an undecodable 2xx body answers the same way on
    /// every attempt.
    fn never_retried(kind: FailureKind) -> bool {
        matches!(
            kind,
            FailureKind::EntityAbsent | FailureKind::MalformedPayload
        )
    }

    /// Decides whether another attempt follows `attempt` (1-based) that
    /// produced `outcome`.
    #[must_use]
    pub fn should_retry<T>(&self, outcome: &UpstreamOutcome<T>, attempt: u32) -> bool {
        attempt <= self.max_attempts
            && outcome
                .failure_kind()
                .is_some_and(|kind| self.is_retryable(kind))
    }

    /// Returns the wait before issuing `attempt` (1-based).
    ///
    /// The first attempt is never delayed.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            Duration::ZERO
        } else {
            self.backoff.delay_for_retry(attempt - 1)
        }
    }

    /// Drives `attempt_fn` through the policy until a terminal outcome.
    ///
    /// `attempt_fn` receives the 1-based attempt number. Success and
    /// non-retryable failures return immediately. A retryable failure on the
    /// last allowed attempt becomes [`UpstreamOutcome::ExhaustedRetry`]
    /// carrying that failure.
    ///
    /// Dropping the returned future cancels the in-flight attempt and any
    /// pending backoff, so no attempt is issued afterwards.
    pub async fn execute<T, F, Fut>(&self, service: &str, mut attempt_fn: F) -> UpstreamOutcome<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = UpstreamOutcome<T>>,
    {
        let mut attempt: u32 = 1;

        loop {
            let outcome = attempt_fn(attempt).await;

            if self.should_retry(&outcome, attempt) {
                let next = attempt.saturating_add(1);
                let delay = self.delay_before(next);
                warn!(
                    service,
                    attempt,
                    kind = ?outcome.failure_kind(),
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "upstream attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt = next;
                continue;
            }

            return match outcome.into_failure() {
                Ok(failure) if self.is_retryable(failure.kind()) => {
                    warn!(service, attempts = attempt, %failure, "upstream retries exhausted");
                    UpstreamOutcome::ExhaustedRetry {
                        attempts: attempt,
                        last: failure,
                    }
                }
                Ok(failure) => {
                    debug!(service, attempt, %failure, "upstream failure is not retryable");
                    failure.into_outcome()
                }
                Err(outcome) => outcome,
            };
        }
    }
}
