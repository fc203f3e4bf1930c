//! # HTTP Client
//!
//! Shared HTTP client for upstream adapters.
//!
//! Wraps a pooled `reqwest::Client` and turns every response into an
//! [`UpstreamOutcome`]: expected failure categories are returned as values,
//! never as errors. Cloning the client shares the same connection pool.
//!
//! # Examples
//!
//! ```ignore
//! use movies_aggregator::infrastructure::upstream::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let outcome: UpstreamOutcome<MovieInfo> = client.get_json(url).await;
//! ```

use crate::config::{ConfigError, ConfigResult};
use crate::infrastructure::upstream::outcome::{ServerError, UpstreamOutcome, classify_status};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper for upstream adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HttpClient` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> ConfigResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ConfigError::http_client(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Issues one GET request and decodes the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> UpstreamOutcome<T> {
        debug!(%url, "GET");
        match self.client.get(url).send().await {
            Ok(response) => Self::handle_response(response).await,
            Err(e) => UpstreamOutcome::ServerError(Self::map_reqwest_error(&e)),
        }
    }

    /// Issues one GET request with query parameters and decodes the JSON response.
    pub async fn get_json_with_params<T, P>(&self, url: Url, params: &P) -> UpstreamOutcome<T>
    where
        T: DeserializeOwned,
        P: serde::Serialize + ?Sized,
    {
        debug!(%url, "GET");
        match self.client.get(url).query(params).send().await {
            Ok(response) => Self::handle_response(response).await,
            Err(e) => UpstreamOutcome::ServerError(Self::map_reqwest_error(&e)),
        }
    }

    /// Checks the status and decodes the body of a response.
    async fn handle_response<T: DeserializeOwned>(response: Response) -> UpstreamOutcome<T> {
        let status = response.status();

        if status.is_success() {
            match response.json::<T>().await {
                Ok(payload) => UpstreamOutcome::Success(payload),
                Err(e) if e.is_decode() => {
                    UpstreamOutcome::ServerError(ServerError::malformed_payload(
                        status.as_u16(),
                        format!("failed to parse response: {}", e),
                    ))
                }
                Err(e) => UpstreamOutcome::ServerError(Self::map_reqwest_error(&e)),
            }
        } else {
            let body = response.text().await.unwrap_or_default();
            classify_status(status, body).into_outcome()
        }
    }

    /// Maps a reqwest error to a transport failure.
    fn map_reqwest_error(error: &reqwest::Error) -> ServerError {
        if error.is_timeout() {
            ServerError::transport("request timed out")
        } else if error.is_connect() {
            ServerError::transport(format!("connection failed: {}", error))
        } else {
            ServerError::transport(format!("HTTP request failed: {}", error))
        }
    }
}

/// Parses an upstream base URL, rejecting URLs that cannot carry a path.
pub(crate) fn parse_base_url(name: &str, raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw).map_err(|e| ConfigError::invalid_url(name, raw, e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::invalid_url(name, raw, "URL cannot be a base"));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::infrastructure::upstream::outcome::ClientError;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url(server: &MockServer, suffix: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), suffix)).unwrap()
    }

    #[test]
    fn new_client() {
        let client = HttpClient::new(5000);
        assert!(client.is_ok());
        assert_eq!(client.unwrap().timeout_ms(), 5000);
    }

    #[tokio::test]
    async fn decodes_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": 7 })))
            .mount(&server)
            .await;

        let client = HttpClient::new(1000).unwrap();
        let outcome: UpstreamOutcome<serde_json::Value> =
            client.get_json(url(&server, "/items/1")).await;

        assert_eq!(outcome, UpstreamOutcome::Success(json!({ "value": 7 })));
    }

    #[tokio::test]
    async fn sends_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("owner", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(1000).unwrap();
        let outcome: UpstreamOutcome<Vec<serde_json::Value>> = client
            .get_json_with_params(url(&server, "/items"), &[("owner", "abc")])
            .await;

        assert_eq!(outcome, UpstreamOutcome::Success(vec![]));
    }

    #[tokio::test]
    async fn keeps_error_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid year"))
            .mount(&server)
            .await;

        let client = HttpClient::new(1000).unwrap();
        let outcome: UpstreamOutcome<serde_json::Value> =
            client.get_json(url(&server, "/items/1")).await;

        assert_eq!(
            outcome,
            UpstreamOutcome::ClientError(ClientError::Rejected {
                status: 400,
                message: "invalid year".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn malformed_body_is_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = HttpClient::new(1000).unwrap();
        let outcome: UpstreamOutcome<serde_json::Value> =
            client.get_json(url(&server, "/items/1")).await;

        assert!(matches!(
            outcome,
            UpstreamOutcome::ServerError(ServerError {
                status: Some(200),
                malformed: true,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = HttpClient::new(50).unwrap();
        let outcome: UpstreamOutcome<serde_json::Value> =
            client.get_json(url(&server, "/items/1")).await;

        assert_eq!(
            outcome,
            UpstreamOutcome::ServerError(ServerError::transport("request timed out"))
        );
    }
}
