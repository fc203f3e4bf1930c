//! # Upstream Traits
//!
//! Port definitions for the two upstream services the aggregator composes.
//!
//! Each call returns an [`UpstreamOutcome`] with the retry policy already
//! applied, so implementations own both the transport and the resilience
//! policy of their upstream.
//!
//! # Examples
//!
//! ```ignore
//! use movies_aggregator::infrastructure::upstream::traits::MovieInfoSource;
//!
//! struct FixedMovieInfo { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl MovieInfoSource for FixedMovieInfo {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::{MovieInfo, Review};
use crate::domain::value_objects::MovieInfoId;
use crate::infrastructure::upstream::outcome::UpstreamOutcome;
use async_trait::async_trait;
use std::fmt;

/// Source of movie metadata (primary entity).
#[async_trait]
pub trait MovieInfoSource: Send + Sync + fmt::Debug {
    /// Returns the upstream service name used in errors and logs.
    fn service_name(&self) -> &str;

    /// Fetches the movie info for `id`.
    ///
    /// A missing movie is reported as
    /// [`ClientError::EntityAbsent`](crate::infrastructure::upstream::outcome::ClientError::EntityAbsent).
    async fn movie_info(&self, id: &MovieInfoId) -> UpstreamOutcome<MovieInfo>;
}

/// Source of reviews (secondary entities).
#[async_trait]
pub trait ReviewSource: Send + Sync + fmt::Debug {
    /// Returns the upstream service name used in errors and logs.
    fn service_name(&self) -> &str;

    /// Fetches the reviews of the movie `id`.
    ///
    /// No matching reviews is a success with an empty list.
    async fn reviews_for(&self, id: &MovieInfoId) -> UpstreamOutcome<Vec<Review>>;
}
