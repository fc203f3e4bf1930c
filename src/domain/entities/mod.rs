//! # Domain Entities
//!
//! ## Aggregates
//!
//! - [`Movie`]: movie info composed with its reviews
//!
//! ## Entities
//!
//! - [`MovieInfo`]: primary entity served by the movies-info upstream
//! - [`Review`]: secondary entity served by the movies-review upstream

pub mod movie;
pub mod movie_info;
pub mod review;

pub use movie::Movie;
pub use movie_info::MovieInfo;
pub use review::Review;
