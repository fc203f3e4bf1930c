//! # Upstream Services
//!
//! Resilient clients for the services the aggregator composes.
//!
//! ## Ports
//!
//! - [`MovieInfoSource`]: primary movie metadata lookup
//! - [`ReviewSource`]: secondary review lookup
//!
//! ## Implementations
//!
//! - [`MoviesInfoRestClient`]: `GET {base}/{id}` against movies-info
//! - [`ReviewsRestClient`]: `GET {base}?movieInfoId={id}` against movies-review
//!
//! ## Resilience
//!
//! - [`RetrySpec`]: fixed-delay retry with a failure-kind allow-list
//! - [`UpstreamOutcome`] and [`UpstreamError`]: failure taxonomy

pub mod error;
pub mod http_client;
pub mod movies_info_client;
pub mod outcome;
pub mod retry;
pub mod reviews_client;
pub mod traits;

pub use error::{UpstreamError, UpstreamResult};
pub use http_client::HttpClient;
pub use movies_info_client::{MOVIES_INFO_SERVICE, MoviesInfoRestClient};
pub use outcome::{ClientError, Failure, FailureKind, ServerError, UpstreamOutcome};
pub use retry::{Backoff, RetrySpec};
pub use reviews_client::{MOVIES_REVIEW_SERVICE, ReviewsRestClient};
pub use traits::{MovieInfoSource, ReviewSource};
