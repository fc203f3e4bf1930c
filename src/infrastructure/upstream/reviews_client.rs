//! # Reviews Client
//!
//! [`ReviewSource`] backed by the movies-review REST service
//! (`GET {base}?{param}={id}`).

use crate::config::{ConfigError, ConfigResult};
use crate::domain::entities::Review;
use crate::domain::value_objects::MovieInfoId;
use crate::infrastructure::upstream::http_client::{HttpClient, parse_base_url};
use crate::infrastructure::upstream::outcome::{ClientError, UpstreamOutcome};
use crate::infrastructure::upstream::retry::RetrySpec;
use crate::infrastructure::upstream::traits::ReviewSource;
use async_trait::async_trait;
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Service name of the movies-review upstream.
pub const MOVIES_REVIEW_SERVICE: &str = "movies-review";

/// Default query parameter carrying the movie info id.
pub const DEFAULT_REVIEWS_QUERY_PARAM: &str = "movieInfoId";

/// REST client for the movies-review upstream.
#[derive(Debug, Clone)]
pub struct ReviewsRestClient {
    http: HttpClient,
    base_url: Url,
    query_param: String,
    retry: Arc<RetrySpec>,
}

impl ReviewsRestClient {
    /// Creates a client for the movies-review service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` is invalid.
    pub fn new(http: HttpClient, base_url: &str, retry: Arc<RetrySpec>) -> ConfigResult<Self> {
        Ok(Self {
            http,
            base_url: parse_base_url("reviews_url", base_url)?,
            query_param: DEFAULT_REVIEWS_QUERY_PARAM.to_string(),
            retry,
        })
    }

    /// Sets the query parameter carrying the movie info id.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `param` is blank.
    pub fn with_query_param(mut self, param: impl Into<String>) -> ConfigResult<Self> {
        let param = param.into();
        if param.trim().is_empty() {
            return Err(ConfigError::invalid("reviews query parameter must not be empty"));
        }
        self.query_param = param;
        Ok(self)
    }

    /// Returns the query parameter carrying the movie info id.
    #[must_use]
    pub fn query_param(&self) -> &str {
        &self.query_param
    }
}

#[async_trait]
impl ReviewSource for ReviewsRestClient {
    fn service_name(&self) -> &str {
        MOVIES_REVIEW_SERVICE
    }

    #[instrument(skip(self), fields(service = MOVIES_REVIEW_SERVICE))]
    async fn reviews_for(&self, id: &MovieInfoId) -> UpstreamOutcome<Vec<Review>> {
        let params = [(self.query_param.as_str(), id.as_str())];

        let outcome = self
            .retry
            .execute(MOVIES_REVIEW_SERVICE, |_| {
                self.http
                    .get_json_with_params::<Vec<Review>, _>(self.base_url.clone(), &params)
            })
            .await;

        match outcome {
            UpstreamOutcome::ClientError(ClientError::EntityAbsent { .. }) => {
                debug!("no reviews found");
                UpstreamOutcome::Success(Vec::new())
            }
            other => other,
        }
    }
}
