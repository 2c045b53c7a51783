//! Secret Manager client configuration.

use crate::credentials::{Credentials, DEFAULT_METADATA_HOST};
use rust_common::HttpConfig;
use std::time::Duration;

/// Public Secret Manager REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://secretmanager.googleapis.com/v1";

/// Overrides [`DEFAULT_ENDPOINT`], e.g. for an emulator.
pub const ENDPOINT_ENV: &str = "SECRET_MANAGER_ENDPOINT";

/// Static OAuth2 access token.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Overrides the metadata server host.
pub const METADATA_HOST_ENV: &str = "GCE_METADATA_HOST";

/// Secret Manager client configuration.
#[derive(Debug)]
pub struct SecretManagerConfig {
    /// Project id or number that owns the secrets
    pub project_id: String,
    /// Replica locations for newly created secrets; empty means automatic
    pub locations: Vec<String>,
    /// REST endpoint including the API version path
    pub endpoint: String,
    /// How requests are authenticated
    pub credentials: Credentials,
    /// HTTP transport settings
    pub http: HttpConfig,
}

impl SecretManagerConfig {
    /// Configuration for `project_id`, seeded from the process environment.
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::from_lookup(project_id, |key| std::env::var(key).ok())
    }

    /// Configuration for `project_id`, seeded from `lookup` instead of the
    /// process environment.
    #[must_use]
    pub fn from_lookup<F>(project_id: impl Into<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let endpoint = lookup(ENDPOINT_ENV).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let credentials = match lookup(ACCESS_TOKEN_ENV) {
            Some(token) => Credentials::access_token(token),
            None => {
                let host = lookup(METADATA_HOST_ENV)
                    .unwrap_or_else(|| DEFAULT_METADATA_HOST.to_string());
                Credentials::metadata_server(&host)
            }
        };

        Self {
            project_id: project_id.into(),
            locations: Vec::new(),
            endpoint,
            credentials,
            http: HttpConfig::default()
                .with_user_agent(concat!("secret-manager-client/", env!("CARGO_PKG_VERSION")))
                .with_api_client(concat!("gl-rust secret-manager-client/", env!("CARGO_PKG_VERSION"))),
        }
    }

    /// Set replica locations for newly created secrets.
    #[must_use]
    pub fn with_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations = locations.into_iter().map(Into::into).collect();
        self
    }

    /// Set the REST endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the per-request HTTP timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }
}
