//! # Application Layer
//!
//! Use cases built on top of the upstream ports.

pub mod error;
pub mod services;

pub use error::{AggregationError, AggregationResult};
pub use services::{AggregationConfig, MovieAggregationService};
