//! # Movies Info Client
//!
//! [`MovieInfoSource`] backed by the movies-info REST service
//! (`GET {base}/{id}`).

use crate::config::ConfigResult;
use crate::domain::entities::MovieInfo;
use crate::domain::value_objects::MovieInfoId;
use crate::infrastructure::upstream::http_client::{HttpClient, parse_base_url};
use crate::infrastructure::upstream::outcome::{ClientError, ServerError, UpstreamOutcome};
use crate::infrastructure::upstream::retry::RetrySpec;
use crate::infrastructure::upstream::traits::MovieInfoSource;
use async_trait::async_trait;
use reqwest::Url;
use std::sync::Arc;
use tracing::{info, instrument};

/// Service name of the movies-info upstream.
pub const MOVIES_INFO_SERVICE: &str = "movies-info";

/// REST client for the movies-info upstream.
#[derive(Debug, Clone)]
pub struct MoviesInfoRestClient {
    http: HttpClient,
    base_url: Url,
    retry: Arc<RetrySpec>,
}

impl MoviesInfoRestClient {
    /// Creates a client for the movies-info service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` does not parse or cannot
    /// carry path segments.
    pub fn new(http: HttpClient, base_url: &str, retry: Arc<RetrySpec>) -> ConfigResult<Self> {
        let base_url = parse_base_url("movies_info_url", base_url)?;
        Ok(Self {
            http,
            base_url,
            retry,
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `{base}/{id}` with `id` encoded as a single path segment.
    fn movie_url(&self, id: &MovieInfoId) -> Option<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push(id.as_str());
        Some(url)
    }
}

#[async_trait]
impl MovieInfoSource for MoviesInfoRestClient {
    fn service_name(&self) -> &str {
        MOVIES_INFO_SERVICE
    }

    #[instrument(skip(self), fields(service = MOVIES_INFO_SERVICE))]
    async fn movie_info(&self, id: &MovieInfoId) -> UpstreamOutcome<MovieInfo> {
        let Some(url) = self.movie_url(id) else {
            return UpstreamOutcome::ServerError(ServerError::transport(format!(
                "cannot build movie info URL from {}",
                self.base_url
            )));
        };

        let outcome = self
            .retry
            .execute(MOVIES_INFO_SERVICE, |_| self.http.get_json::<MovieInfo>(url.clone()))
            .await;

        match outcome {
            UpstreamOutcome::ClientError(ClientError::EntityAbsent { .. }) => {
                info!("movie info not found");
                UpstreamOutcome::ClientError(ClientError::EntityAbsent {
                    message: format!("There is no movie info available for id: {}", id),
                })
            }
            other => other,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::infrastructure::upstream::outcome::FailureKind;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: &str, retries: u32) -> MoviesInfoRestClient {
        MoviesInfoRestClient::new(
            HttpClient::new(1000).unwrap(),
            base,
            Arc::new(RetrySpec::fixed_delay(retries, Duration::from_millis(5))),
        )
        .unwrap()
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = MoviesInfoRestClient::new(
            HttpClient::new(1000).unwrap(),
            "not a url",
            Arc::new(RetrySpec::default()),
        );
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));

        let result = MoviesInfoRestClient::new(
            HttpClient::new(1000).unwrap(),
            "mailto:movies@example.com",
            Arc::new(RetrySpec::default()),
        );
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn movie_url_appends_encoded_segment() {
        let client = client("http://localhost:8080/v1/movies-info/", 0);
        let url = client.movie_url(&MovieInfoId::new("a b/c")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/movies-info/a%20b%2Fc");
    }

    #[tokio::test]
    async fn fetches_movie_info() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/movies-info/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "movieInfoId": "abc",
                "name": "Batman Begins",
                "year": 2005,
                "cast": ["Christian Bale"],
                "releaseDate": "2005-06-15"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&format!("{}/v1/movies-info", server.uri()), 3);
        let outcome = client.movie_info(&MovieInfoId::new("abc")).await;

        match outcome {
            UpstreamOutcome::Success(info) => {
                assert_eq!(info.name.as_deref(), Some("Batman Begins"));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn not_found_is_entity_absent_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/movies-info/zzz"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&format!("{}/v1/movies-info", server.uri()), 3);
        let outcome = client.movie_info(&MovieInfoId::new("zzz")).await;

        assert_eq!(
            outcome,
            UpstreamOutcome::ClientError(ClientError::EntityAbsent {
                message: "There is no movie info available for id: zzz".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn server_error_is_retried_until_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/movies-info/abc"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string("MoviesInfoService Unavailable"),
            )
            .expect(4)
            .mount(&server)
            .await;

        let client = client(&format!("{}/v1/movies-info", server.uri()), 3);
        let outcome = client.movie_info(&MovieInfoId::new("abc")).await;

        match outcome {
            UpstreamOutcome::ExhaustedRetry { attempts, last } => {
                assert_eq!(attempts, 4);
                assert_eq!(last.message(), "MoviesInfoService Unavailable");
            }
            other => panic!("expected exhausted retry, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_success_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/movies-info/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "movieInfoId": "abc",
                "releaseDate": "15/06/2005"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&format!("{}/v1/movies-info", server.uri()), 3);
        let outcome = client.movie_info(&MovieInfoId::new("abc")).await;

        match outcome {
            UpstreamOutcome::ServerError(e) => {
                assert_eq!(e.kind(), FailureKind::MalformedPayload);
                assert_eq!(e.status, Some(200));
            }
            other => panic!("expected malformed payload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_refused_is_retried() {
        // Nothing listens on the discard port.
        let client = client("http://127.0.0.1:9/v1/movies-info", 1);
        let outcome = client.movie_info(&MovieInfoId::new("abc")).await;

        assert!(matches!(
            outcome,
            UpstreamOutcome::ExhaustedRetry { attempts: 2, .. }
        ));
    }

    #[test]
    fn service_name() {
        let client = client("http://localhost:8080/v1/movies-info", 0);
        assert_eq!(client.service_name(), MOVIES_INFO_SERVICE);
        assert_eq!(client.base_url().path(), "/v1/movies-info");
    }
}
