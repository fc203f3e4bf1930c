//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`MovieAggregationService`]: composes movie info and reviews

pub mod movie_aggregation;

pub use movie_aggregation::{AggregationConfig, MovieAggregationService};
