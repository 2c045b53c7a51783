//! Bearer token acquisition for Secret Manager requests.

use crate::error::{SecretManagerError, SecretManagerResult};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Default metadata server host on GCE, GKE and Cloud Run.
pub const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";

/// Path of the default service account token on the metadata server.
const METADATA_TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

/// Tokens are refreshed this long before the metadata server says they expire.
const EXPIRY_GRACE: Duration = Duration::from_secs(60);

/// How the client authenticates.
#[derive(Debug)]
pub enum Credentials {
    /// A caller-supplied OAuth2 access token
    AccessToken(SecretString),
    /// Tokens fetched from the instance metadata server
    MetadataServer {
        /// Full token endpoint URL
        endpoint: String,
    },
    /// No `Authorization` header; for emulators
    Anonymous,
}

impl Credentials {
    /// Static access token credentials.
    #[must_use]
    pub fn access_token(token: impl Into<String>) -> Self {
        Self::AccessToken(SecretString::from(token.into()))
    }

    /// Metadata server credentials for the given host (e.g. `GCE_METADATA_HOST`).
    #[must_use]
    pub fn metadata_server(host: &str) -> Self {
        let host = host.trim_end_matches('/');
        let endpoint = if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}{METADATA_TOKEN_PATH}")
        } else {
            format!("http://{host}{METADATA_TOKEN_PATH}")
        };
        Self::MetadataServer { endpoint }
    }
}

#[derive(Debug)]
struct CachedToken {
    token: SecretString,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Resolves [`Credentials`] into bearer tokens, caching fetched ones.
#[derive(Debug)]
pub(crate) struct TokenSource {
    credentials: Credentials,
    http: Client,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenSource {
    pub(crate) fn new(credentials: Credentials, http: Client) -> Self {
        Self {
            credentials,
            http,
            cached: RwLock::new(None),
        }
    }

    /// Current bearer token, or `None` for anonymous access.
    pub(crate) async fn bearer(&self) -> SecretManagerResult<Option<String>> {
        match &self.credentials {
            Credentials::AccessToken(token) => Ok(Some(token.expose_secret().to_owned())),
            Credentials::MetadataServer { endpoint } => {
                self.metadata_token(endpoint).await.map(Some)
            }
            Credentials::Anonymous => Ok(None),
        }
    }

    async fn metadata_token(&self, endpoint: &str) -> SecretManagerResult<String> {
        {
            let cached = self.cached.read().await;
            if let Some(cached) = cached.as_ref() {
                if cached.expires_at > Instant::now() {
                    return Ok(cached.token.expose_secret().to_owned());
                }
            }
        }

        let mut cached = self.cached.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(current) = cached.as_ref() {
            if current.expires_at > Instant::now() {
                return Ok(current.token.expose_secret().to_owned());
            }
        }

        debug!(endpoint, "Fetching access token from metadata server");
        let response = self
            .http
            .get(endpoint)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| SecretManagerError::transport(format!("metadata server: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SecretManagerError::AccessDenied(format!(
                "metadata server refused token request: {status} {text}"
            )));
        }

        let body: MetadataTokenResponse = response
            .json()
            .await
            .map_err(|e| SecretManagerError::decode(format!("metadata token response: {e}")))?;

        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(EXPIRY_GRACE);
        let token = body.access_token.clone();
        *cached = Some(CachedToken {
            token: SecretString::from(body.access_token),
            expires_at: Instant::now() + lifetime,
        });

        info!(ttl_secs = lifetime.as_secs(), "Obtained access token from metadata server");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_endpoint_from_host() {
        let Credentials::MetadataServer { endpoint } = Credentials::metadata_server("169.254.169.254")
        else {
            panic!("expected metadata credentials");
        };
        assert_eq!(
            endpoint,
            "http://169.254.169.254/computeMetadata/v1/instance/service-accounts/default/token"
        );
    }

    #[test]
    fn test_metadata_endpoint_keeps_scheme() {
        let Credentials::MetadataServer { endpoint } =
            Credentials::metadata_server("http://127.0.0.1:8080/")
        else {
            panic!("expected metadata credentials");
        };
        assert_eq!(
            endpoint,
            "http://127.0.0.1:8080/computeMetadata/v1/instance/service-accounts/default/token"
        );
    }

    #[test]
    fn test_access_token_not_in_debug() {
        let creds = Credentials::access_token("ya29.very-secret");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("ya29.very-secret"));
    }

    #[tokio::test]
    async fn test_static_and_anonymous_bearer() {
        let http = Client::new();
        let source = TokenSource::new(Credentials::access_token("ya29.token"), http.clone());
        assert_eq!(source.bearer().await.unwrap().as_deref(), Some("ya29.token"));

        let source = TokenSource::new(Credentials::Anonymous, http);
        assert!(source.bearer().await.unwrap().is_none());
    }
}
