//! # API Layer
//!
//! Inbound interfaces of the aggregator.

pub mod rest;
