//! # Infrastructure Layer
//!
//! Adapters for external systems.
//!
//! - [`upstream`]: resilient REST clients for the movies-info and
//!   movies-review services

pub mod upstream;
