//! # Domain Layer
//!
//! Types describing the movie data the aggregator composes.
//!
//! - [`entities`]: upstream payloads and the composed [`Movie`](entities::Movie)
//! - [`value_objects`]: identifiers used to join upstream results

pub mod entities;
pub mod value_objects;
