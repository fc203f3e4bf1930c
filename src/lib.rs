//! # Movies Aggregator
//!
//! Resilient aggregation of movie metadata and reviews.
//!
//! A single request for a movie fans out, in sequence, to two upstream
//! services: movies-info for the movie itself and movies-review for its
//! reviews. The results are merged into one [`Movie`](domain::entities::Movie).
//!
//! # Architecture
//!
//! ```text
//! api::rest          axum routes, status mapping
//!     │
//! application        MovieAggregationService (composition, deadline)
//!     │
//! infrastructure     upstream clients, RetrySpec, failure taxonomy
//!     │
//! domain             Movie, MovieInfo, Review, MovieInfoId
//! ```
//!
//! # Failure Handling
//!
//! Every upstream response is classified into an
//! [`UpstreamOutcome`](infrastructure::upstream::UpstreamOutcome):
//!
//! - 404 means the entity is absent, which is a valid empty result
//! - other 4xx are client rejections and are never retried
//! - 5xx and transport failures are transient and retried with a fixed delay
//! - a transient failure that outlives the retry budget becomes terminal
//!
//! # Example
//!
//! ```no_run
//! use movies_aggregator::application::services::MovieAggregationService;
//! use movies_aggregator::config::AppConfig;
//! use movies_aggregator::domain::value_objects::MovieInfoId;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = AppConfig::load(None)?;
//! let service = MovieAggregationService::from_config(&config)?;
//! let movie = service.get_movie(&MovieInfoId::new("abc")).await?;
//! println!("{} reviews", movie.review_list().len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
