//! Secret Manager REST client.

use crate::{
    config::SecretManagerConfig,
    context::CallContext,
    credentials::TokenSource,
    error::{SecretManagerError, SecretManagerResult},
    model::{
        AccessSecretVersionResponse, AddSecretVersionRequest, Replication, Secret,
        SecretPayloadRef, SecretVersion,
    },
    provider::SecretStore,
    resource::SecretName,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use rust_common::{ApiError, build_http_client};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Client for one project's secrets.
///
/// Every call is bound by the [`CallContext`] the client was built with.
#[derive(Debug, Clone)]
pub struct SecretClient {
    http: Client,
    endpoint: Url,
    project_id: String,
    locations: Vec<String>,
    tokens: Arc<TokenSource>,
    ctx: CallContext,
}

impl SecretClient {
    /// Connect to Secret Manager for `project_id`, using environment
    /// configuration for endpoint and credentials.
    ///
    /// Newly created secrets replicate to `locations`, or automatically when
    /// it is empty. No request is made until the first operation.
    ///
    /// # Errors
    ///
    /// Returns [`SecretManagerError::Connection`] if `ctx` is already
    /// cancelled or expired, or the transport cannot be set up.
    pub fn connect<I, S>(
        ctx: CallContext,
        project_id: impl Into<String>,
        locations: I,
    ) -> SecretManagerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(ctx, SecretManagerConfig::new(project_id).with_locations(locations))
    }

    /// Connect with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SecretManagerError::Connection`] if `ctx` is already
    /// cancelled or expired, the endpoint is not a usable base URL, or the
    /// HTTP client cannot be built.
    pub fn with_config(ctx: CallContext, config: SecretManagerConfig) -> SecretManagerResult<Self> {
        if let Some(err) = ctx.err() {
            return Err(SecretManagerError::connection(format!(
                "call context unusable: {err}"
            )));
        }

        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            SecretManagerError::connection(format!("invalid endpoint {}: {e}", config.endpoint))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(SecretManagerError::connection(format!(
                "endpoint cannot be a base URL: {endpoint}"
            )));
        }

        let http = build_http_client(&config.http)
            .map_err(|e| SecretManagerError::connection(e.to_string()))?;
        let tokens = Arc::new(TokenSource::new(config.credentials, http.clone()));

        info!(
            project = %config.project_id,
            endpoint = %endpoint,
            locations = config.locations.len(),
            "Secret Manager client ready"
        );

        Ok(Self {
            http,
            endpoint,
            project_id: config.project_id,
            locations: config.locations,
            tokens,
            ctx,
        })
    }

    /// A client sharing this one's connection, bound to `ctx` instead.
    #[must_use]
    pub fn with_context(&self, ctx: CallContext) -> Self {
        Self {
            ctx,
            ..self.clone()
        }
    }

    /// Project the client operates on.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Replica locations used when creating secrets.
    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Read the payload of the latest version of `name`.
    ///
    /// # Errors
    ///
    /// [`SecretManagerError::NotFound`] if the secret does not exist or has
    /// no versions; otherwise the service's error, unmodified.
    #[instrument(skip(self), fields(project = %self.project_id))]
    pub async fn get(&self, name: &str) -> SecretManagerResult<Vec<u8>> {
        let version = self.secret_name(name).latest();
        self.ctx
            .run(async {
                let url = version.url(&self.endpoint, ":access")?;
                let request = self.authorized(Method::GET, url).await?;
                let response: AccessSecretVersionResponse = self.execute(request).await?;
                debug!(version = %response.name, "Accessed secret version");
                Ok(response.payload.data)
            })
            .await
    }

    /// Store `value` as the new latest version of `name`, creating the secret
    /// first if it does not exist.
    ///
    /// # Errors
    ///
    /// Any lookup failure other than not-found, a failed create (other than
    /// a concurrent creator winning), or a failed version append.
    #[instrument(skip(self, value), fields(project = %self.project_id, len = value.len()))]
    pub async fn set(&self, name: &str, value: &[u8]) -> SecretManagerResult<()> {
        let requested = self.secret_name(name);
        self.ctx
            .run(async {
                let target = match self.fetch_secret(&requested).await {
                    Ok(secret) => Self::resolved_name(&secret, &requested)?,
                    Err(e) if e.is_not_found() => self.create_secret(&requested).await?,
                    Err(e) => return Err(e),
                };
                self.add_secret_version(&target, value).await
            })
            .await
    }

    /// Delete `name` and all of its versions.
    ///
    /// # Errors
    ///
    /// [`SecretManagerError::NotFound`] if the secret does not exist;
    /// otherwise the service's error, unmodified.
    #[instrument(skip(self), fields(project = %self.project_id))]
    pub async fn delete(&self, name: &str) -> SecretManagerResult<()> {
        let secret = self.secret_name(name);
        self.ctx
            .run(async {
                let url = secret.url(&self.endpoint, "")?;
                let request = self.authorized(Method::DELETE, url).await?;
                let _: IgnoredAny = self.execute(request).await?;
                info!(secret = %secret, "Deleted secret");
                Ok(())
            })
            .await
    }

    /// Release the connection.
    pub fn close(self) {
        info!(project = %self.project_id, "Closing Secret Manager client");
        drop(self);
    }

    fn secret_name(&self, name: &str) -> SecretName {
        SecretName::new(self.project_id.as_str(), name)
    }

    /// The service may answer with the project number instead of the id;
    /// later calls address the secret by the name it returned.
    fn resolved_name(secret: &Secret, requested: &SecretName) -> SecretManagerResult<SecretName> {
        if secret.name.is_empty() {
            Ok(requested.clone())
        } else {
            secret.name.parse()
        }
    }

    async fn fetch_secret(&self, secret: &SecretName) -> SecretManagerResult<Secret> {
        let url = secret.url(&self.endpoint, "")?;
        let request = self.authorized(Method::GET, url).await?;
        self.execute(request).await
    }

    async fn create_secret(&self, secret: &SecretName) -> SecretManagerResult<SecretName> {
        let mut url = secret.collection_url(&self.endpoint)?;
        url.query_pairs_mut().append_pair("secretId", secret.secret());
        let body = Secret::new(Replication::for_locations(&self.locations));

        let request = self.authorized(Method::POST, url).await?.json(&body);
        match self.execute::<Secret>(request).await {
            Ok(created) => {
                info!(secret = %secret, locations = self.locations.len(), "Created secret");
                Self::resolved_name(&created, secret)
            }
            Err(SecretManagerError::AlreadyExists(msg)) => {
                warn!(secret = %secret, %msg, "Secret created concurrently, adding version to it");
                Ok(secret.clone())
            }
            Err(e) => Err(e),
        }
    }

    async fn add_secret_version(&self, secret: &SecretName, value: &[u8]) -> SecretManagerResult<()> {
        let url = secret.url(&self.endpoint, ":addVersion")?;
        let body = AddSecretVersionRequest {
            payload: SecretPayloadRef { data: value },
        };

        let request = self.authorized(Method::POST, url).await?.json(&body);
        let version: SecretVersion = self.execute(request).await?;
        debug!(version = %version.name, "Added secret version");
        Ok(())
    }

    async fn authorized(&self, method: Method, url: Url) -> SecretManagerResult<RequestBuilder> {
        let request = self.http.request(method, url);
        Ok(match self.tokens.bearer().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> SecretManagerResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return response.json().await.map_err(|e| SecretManagerError::decode(e.to_string()));
        }

        let body = response.bytes().await.map_err(|e| {
            SecretManagerError::transport(format!("reading {status} error body: {e}"))
        })?;
        let err = ApiError::from_response(status.as_u16(), &body);
        debug!(status = %err.status, http_status = err.http_status, "Secret Manager call failed");
        Err(err.into())
    }
}

#[async_trait]
impl SecretStore for SecretClient {
    type Error = SecretManagerError;

    async fn get(&self, name: &str) -> SecretManagerResult<Vec<u8>> {
        Self::get(self, name).await
    }

    async fn set(&self, name: &str, value: &[u8]) -> SecretManagerResult<()> {
        Self::set(self, name, value).await
    }

    async fn delete(&self, name: &str) -> SecretManagerResult<()> {
        Self::delete(self, name).await
    }
}
