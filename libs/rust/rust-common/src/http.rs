//! Shared HTTP client configuration for Google API clients.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use thiserror::Error;

/// Header Google APIs use to attribute traffic to a client library.
pub const API_CLIENT_HEADER: &str = "x-goog-api-client";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_POOL_IDLE: Duration = Duration::from_secs(90);
const DEFAULT_POOL_MAX_IDLE: usize = 10;

/// Transport settings shared by every Google API client built here.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// TCP and TLS connect timeout
    pub connect_timeout: Duration,
    /// How long an idle pooled connection is kept
    pub pool_idle_timeout: Duration,
    /// Idle pooled connections kept per host
    pub pool_max_idle_per_host: usize,
    /// `User-Agent` header
    pub user_agent: String,
    /// Value sent in the `x-goog-api-client` header, if any
    pub api_client: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            pool_idle_timeout: DEFAULT_POOL_IDLE,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE,
            user_agent: concat!("rust-common/", env!("CARGO_PKG_VERSION")).to_string(),
            api_client: None,
        }
    }
}

impl HttpConfig {
    /// Override the whole-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the `x-goog-api-client` attribution value.
    #[must_use]
    pub fn with_api_client(mut self, api_client: impl Into<String>) -> Self {
        self.api_client = Some(api_client.into());
        self
    }
}

/// Errors raised while building an HTTP client.
#[derive(Error, Debug)]
pub enum HttpBuildError {
    /// A configured header value is not valid
    #[error("invalid header value for {header}: {source}")]
    InvalidHeader {
        /// Header name
        header: &'static str,
        /// Underlying error
        #[source]
        source: InvalidHeaderValue,
    },

    /// reqwest refused the configuration
    #[error("HTTP client build failed: {0}")]
    Build(#[from] reqwest::Error),
}

/// Build a configured HTTP client with rustls TLS and connection pooling.
///
/// # Errors
///
/// Returns an error if a configured header value is invalid or the client
/// cannot be built (e.g. TLS initialization fails).
///
/// # Examples
///
/// ```
/// use rust_common::{HttpConfig, build_http_client};
/// use std::time::Duration;
///
/// let config = HttpConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_api_client("gl-rust/1.85");
/// let client = build_http_client(&config).expect("Failed to build client");
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, HttpBuildError> {
    let mut headers = HeaderMap::new();
    if let Some(api_client) = &config.api_client {
        let value = HeaderValue::from_str(api_client).map_err(|source| {
            HttpBuildError::InvalidHeader {
                header: API_CLIENT_HEADER,
                source,
            }
        })?;
        headers.insert(HeaderName::from_static(API_CLIENT_HEADER), value);
    }

    let client = ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .use_rustls_tls()
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.pool_max_idle_per_host, DEFAULT_POOL_MAX_IDLE);
        assert!(config.user_agent.starts_with("rust-common/"));
        assert!(config.api_client.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = HttpConfig::default()
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent")
            .with_api_client("gl-rust/test");

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.api_client.as_deref(), Some("gl-rust/test"));
    }

    #[test]
    fn test_build_client() {
        let config = HttpConfig::default().with_api_client("gl-rust/test");
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_rejects_invalid_header() {
        let config = HttpConfig::default().with_api_client("bad\nvalue");
        let err = build_http_client(&config).unwrap_err();
        assert!(matches!(err, HttpBuildError::InvalidHeader { .. }));
    }
}
