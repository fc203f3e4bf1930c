//! # Movie Aggregation Service
//!
//! Composes movie info and reviews into one [`Movie`].
//!
//! The review lookup depends on the identifier carried by the movie info,
//! so the two upstream calls run strictly in sequence:
//!
//! 1. Fetch the movie info. An absent movie yields [`Movie::default`].
//! 2. Any other terminal failure is propagated unchanged.
//! 3. Fetch reviews keyed by the movie info id (skipped when it has none).
//!    A review failure is propagated, never replaced by an empty list.
//! 4. Merge both into a [`Movie`].
//!
//! Both calls share one deadline. When it expires the in-flight upstream
//! call and any pending retry delay are dropped, and the error names the
//! upstream that was in flight.

use crate::application::error::{AggregationError, AggregationResult};
use crate::config::{AppConfig, ConfigResult};
use crate::domain::entities::{Movie, Review};
use crate::domain::value_objects::MovieInfoId;
use crate::infrastructure::upstream::{
    HttpClient, MovieInfoSource, MoviesInfoRestClient, ReviewSource, ReviewsRestClient,
    UpstreamOutcome,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, instrument, warn};

/// Configuration for movie aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Overall deadline for one aggregation in milliseconds.
    pub timeout_ms: u64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

impl AggregationConfig {
    /// Creates a new configuration with the specified deadline.
    #[must_use]
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }
}

/// Service composing movie info with its reviews.
#[derive(Debug, Clone)]
pub struct MovieAggregationService {
    movie_info_source: Arc<dyn MovieInfoSource>,
    review_source: Arc<dyn ReviewSource>,
    config: AggregationConfig,
}

impl MovieAggregationService {
    /// Creates a new MovieAggregationService.
    #[must_use]
    pub fn new(
        movie_info_source: Arc<dyn MovieInfoSource>,
        review_source: Arc<dyn ReviewSource>,
        config: AggregationConfig,
    ) -> Self {
        Self {
            movie_info_source,
            review_source,
            config,
        }
    }

    /// Wires the REST upstream clients described by `config`.
    ///
    /// Both clients share one connection pool and one retry policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the HTTP client cannot be built or an
    /// upstream URL is invalid.
    pub fn from_config(config: &AppConfig) -> ConfigResult<Self> {
        let http = HttpClient::new(config.upstream.timeout_ms)?;
        let retry = Arc::new(config.retry.to_spec());

        let movies_info = MoviesInfoRestClient::new(
            http.clone(),
            &config.upstream.movies_info_url,
            Arc::clone(&retry),
        )?;
        let reviews = ReviewsRestClient::new(http, &config.upstream.reviews_url, retry)?
            .with_query_param(config.upstream.reviews_query_param.clone())?;

        Ok(Self::new(
            Arc::new(movies_info),
            Arc::new(reviews),
            AggregationConfig::with_timeout(config.aggregation.timeout_ms),
        ))
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Fetches a movie and its reviews.
    ///
    /// # Errors
    ///
    /// Returns `AggregationError::Upstream` with the upstream failure unchanged
    /// if either lookup fails terminally (an absent movie is not a failure),
    /// or `AggregationError::Timeout` naming the upstream in flight when the
    /// deadline expired.
    #[instrument(skip(self), fields(movie_info_id = %id))]
    pub async fn get_movie(&self, id: &MovieInfoId) -> AggregationResult<Movie> {
        let deadline = Instant::now() + Duration::from_millis(self.config.timeout_ms);
        let service = self.movie_info_source.service_name();

        let movie_info = match self
            .within(deadline, service, self.movie_info_source.movie_info(id))
            .await?
            .into_result(service)
        {
            Ok(movie_info) => movie_info,
            Err(e) if e.is_entity_absent() => {
                info!(reason = %e, "movie not found, returning empty movie");
                return Ok(Movie::default());
            }
            Err(e) => {
                warn!(error = %e, "movie info lookup failed");
                return Err(e.into());
            }
        };

        let reviews = match movie_info.lookup_id() {
            Some(lookup_id) => self.fetch_reviews(deadline, lookup_id).await?,
            None => {
                debug!("movie info carries no id, skipping review lookup");
                Vec::new()
            }
        };

        info!(reviews = reviews.len(), "movie aggregated");
        Ok(Movie::new(movie_info, reviews))
    }

    async fn fetch_reviews(
        &self,
        deadline: Instant,
        id: &MovieInfoId,
    ) -> AggregationResult<Vec<Review>> {
        let service = self.review_source.service_name();

        match self
            .within(deadline, service, self.review_source.reviews_for(id))
            .await?
            .into_result(service)
        {
            Ok(reviews) => Ok(reviews),
            Err(e) if e.is_entity_absent() => Ok(Vec::new()),
            Err(e) => {
                warn!(error = %e, "review lookup failed");
                Err(e.into())
            }
        }
    }

    /// Runs one upstream call against the shared aggregation deadline.
    ///
    /// On expiry the call future is dropped, cancelling its request and any
    /// pending retry delay.
    async fn within<T, F>(
        &self,
        deadline: Instant,
        service: &str,
        call: F,
    ) -> AggregationResult<UpstreamOutcome<T>>
    where
        F: Future<Output = UpstreamOutcome<T>>,
    {
        timeout_at(deadline, call).await.map_err(|_| {
            warn!(
                timeout_ms = self.config.timeout_ms,
                service, "aggregation deadline expired"
            );
            AggregationError::timeout(self.config.timeout_ms, service)
        })
    }
}
