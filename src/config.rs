//! # Configuration
//!
//! Startup configuration for the aggregator.
//!
//! Sources are layered, later ones winning:
//!
//! 1. Struct defaults
//! 2. Optional TOML file (default `config/movies.toml`)
//! 3. Environment variables prefixed with `MOVIES__`, nested with `__`
//!    (e.g. `MOVIES__RETRY__MAX_ATTEMPTS=5`)
//!
//! Configuration is read once and is immutable afterwards.
//!
//! # Examples
//!
//! ```
//! use movies_aggregator::config::AppConfig;
//!
//! let config = AppConfig::default();
//! assert_eq!(config.retry.max_attempts, 3);
//! assert_eq!(config.retry.delay_ms, 1000);
//! assert!(config.validate().is_ok());
//! ```

use crate::infrastructure::upstream::http_client::parse_base_url;
use crate::infrastructure::upstream::retry::{DEFAULT_DELAY_MS, DEFAULT_MAX_ATTEMPTS, RetrySpec};
use crate::infrastructure::upstream::reviews_client::DEFAULT_REVIEWS_QUERY_PARAM;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config/movies.toml";

/// Environment variable prefix.
const ENV_PREFIX: &str = "MOVIES";

/// Error raised while loading or validating configuration.
///
/// These errors are unrecoverable: the service refuses to start.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sources could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// An upstream URL is unusable.
    #[error("invalid URL for {name} ({url}): {reason}")]
    InvalidUrl {
        /// Setting name.
        name: String,
        /// Offending value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A setting has an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl ConfigError {
    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(
        name: impl Into<String>,
        url: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidUrl {
            name: name.into(),
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid setting error.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Creates an HTTP client error.
    #[must_use]
    pub fn http_client(message: impl Into<String>) -> Self {
        Self::HttpClient(message.into())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8082,
        }
    }
}

impl ServerConfig {
    /// Returns `host:port`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream service locations and transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the movies-info service.
    pub movies_info_url: String,
    /// Base URL of the movies-review service.
    pub reviews_url: String,
    /// Query parameter carrying the movie info id on review lookups.
    pub reviews_query_param: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            movies_info_url: "http://localhost:8080/v1/movies-info".to_string(),
            reviews_url: "http://localhost:8081/v1/reviews".to_string(),
            reviews_query_param: DEFAULT_REVIEWS_QUERY_PARAM.to_string(),
            timeout_ms: 5000,
        }
    }
}

/// Retry settings shared by every upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_attempts: u32,
    /// Fixed delay between attempts in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl RetryConfig {
    /// Builds the shared retry policy.
    #[must_use]
    pub fn to_spec(&self) -> RetrySpec {
        RetrySpec::fixed_delay(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

/// Aggregation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Deadline for one aggregation request in milliseconds.
    pub timeout_ms: u64,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info,movies_aggregator=debug".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Upstream services.
    pub upstream: UpstreamConfig,
    /// Retry policy.
    pub retry: RetryConfig,
    /// Aggregation deadline.
    pub aggregation: AggregationSettings,
    /// Logging.
    pub log: LogConfig,
}

impl AppConfig {
    /// Loads configuration from the optional file and the environment.
    ///
    /// A missing file is not an error; a malformed one is.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or a value is invalid.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let config = Config::builder()
            .add_source(File::from(file).required(path.is_some()))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    /// Deserializes and validates an already-built [`Config`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if deserialization or validation fails.
    pub fn from_config(config: Config) -> ConfigResult<Self> {
        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Checks values that deserialization cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid value.
    pub fn validate(&self) -> ConfigResult<()> {
        parse_base_url("upstream.movies_info_url", &self.upstream.movies_info_url)?;
        parse_base_url("upstream.reviews_url", &self.upstream.reviews_url)?;

        if self.upstream.reviews_query_param.trim().is_empty() {
            return Err(ConfigError::invalid(
                "upstream.reviews_query_param must not be empty",
            ));
        }
        if self.upstream.timeout_ms == 0 {
            return Err(ConfigError::invalid("upstream.timeout_ms must be positive"));
        }
        if self.aggregation.timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "aggregation.timeout_ms must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_address(), "0.0.0.0:8082");
        assert_eq!(config.upstream.reviews_query_param, "movieInfoId");
    }

    #[test]
    fn overrides_apply_over_defaults() {
        let config = Config::builder()
            .set_override("retry.max_attempts", 5)
            .unwrap()
            .set_override("upstream.movies_info_url", "http://info:9000/v1/movies-info")
            .unwrap()
            .build()
            .unwrap();

        let app_config = AppConfig::from_config(config).unwrap();
        assert_eq!(app_config.retry.max_attempts, 5);
        assert_eq!(app_config.retry.delay_ms, 1000);
        assert_eq!(
            app_config.upstream.movies_info_url,
            "http://info:9000/v1/movies-info"
        );
    }

    #[test]
    fn invalid_url_is_rejected() {
        let config = Config::builder()
            .set_override("upstream.reviews_url", "reviews")
            .unwrap()
            .build()
            .unwrap();

        let result = AppConfig::from_config(config);
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = AppConfig::default();
        config.upstream.timeout_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_default_file_is_not_an_error() {
        let config = AppConfig::load(None);
        assert!(config.is_ok());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("does/not/exist.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn loads_toml_file() {
        let dir = std::env::temp_dir().join(format!("movies-aggregator-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("movies.toml");
        std::fs::write(
            &file,
            "[retry]\nmax_attempts = 1\ndelay_ms = 10\n\n[log]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(file.as_path())).unwrap();
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.retry.delay_ms, 10);
        assert_eq!(config.log.format, LogFormat::Json);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn retry_config_builds_fixed_spec() {
        let spec = RetryConfig {
            max_attempts: 2,
            delay_ms: 250,
        }
        .to_spec();
        assert_eq!(spec.total_attempts(), 3);
        assert_eq!(spec.delay_before(2), Duration::from_millis(250));
    }
}
