//! # Value Objects
//!
//! Immutable types with domain semantics.
//!
//! ## Identity Types
//!
//! - [`MovieInfoId`]: opaque join key between movie info and reviews

pub mod ids;

pub use ids::MovieInfoId;
