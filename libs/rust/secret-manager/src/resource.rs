//! Resource names: `projects/<project>/secrets/<secret>[/versions/<version>]`.

use crate::error::{SecretManagerError, SecretManagerResult};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Version alias the service resolves to the most recently added version.
pub const LATEST_VERSION: &str = "latest";

/// Fully qualified name of a secret container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretName {
    project: String,
    secret: String,
}

impl SecretName {
    /// Name of `secret` within `project`.
    #[must_use]
    pub fn new(project: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            secret: secret.into(),
        }
    }

    /// Project id or number.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Secret id within the project.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The `projects/<project>` parent of this secret.
    #[must_use]
    pub fn parent(&self) -> String {
        format!("projects/{}", self.project)
    }

    /// The latest version of this secret.
    #[must_use]
    pub fn latest(&self) -> SecretVersionName {
        SecretVersionName {
            secret: self.clone(),
            version: LATEST_VERSION.to_string(),
        }
    }

    fn segments(&self) -> [&str; 4] {
        ["projects", &self.project, "secrets", &self.secret]
    }

    /// `{endpoint}/projects/{p}/secrets/{s}`, with `suffix` appended to the
    /// last segment (e.g. `":addVersion"`).
    pub(crate) fn url(&self, endpoint: &Url, suffix: &str) -> SecretManagerResult<Url> {
        let [a, b, c, secret] = self.segments();
        join(endpoint, &[a, b, c, &format!("{secret}{suffix}")])
    }

    /// `{endpoint}/projects/{p}/secrets`, the collection this secret is created in.
    pub(crate) fn collection_url(&self, endpoint: &Url) -> SecretManagerResult<Url> {
        join(endpoint, &["projects", &self.project, "secrets"])
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}/secrets/{}", self.project, self.secret)
    }
}

impl FromStr for SecretName {
    type Err = SecretManagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            ["projects", project, "secrets", secret]
                if !project.is_empty() && !secret.is_empty() =>
            {
                Ok(Self::new(*project, *secret))
            }
            _ => Err(SecretManagerError::decode(format!(
                "not a secret resource name: {s}"
            ))),
        }
    }
}

/// Fully qualified name of one secret version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretVersionName {
    secret: SecretName,
    version: String,
}

impl SecretVersionName {
    /// The owning secret.
    #[must_use]
    pub const fn secret(&self) -> &SecretName {
        &self.secret
    }

    /// Version number or alias.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// `{endpoint}/projects/{p}/secrets/{s}/versions/{v}{suffix}`.
    pub(crate) fn url(&self, endpoint: &Url, suffix: &str) -> SecretManagerResult<Url> {
        let [a, b, c, d] = self.secret.segments();
        join(
            endpoint,
            &[a, b, c, d, "versions", &format!("{}{suffix}", self.version)],
        )
    }
}

impl fmt::Display for SecretVersionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/versions/{}", self.secret, self.version)
    }
}

/// Append percent-encoded path segments to `endpoint`.
fn join(endpoint: &Url, segments: &[&str]) -> SecretManagerResult<Url> {
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|()| {
            SecretManagerError::connection(format!("endpoint cannot be a base URL: {endpoint}"))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Url {
        Url::parse("https://secretmanager.googleapis.com/v1").unwrap()
    }

    #[test]
    fn test_display_forms() {
        let name = SecretName::new("proj-A", "k1");
        assert_eq!(name.to_string(), "projects/proj-A/secrets/k1");
        assert_eq!(name.parent(), "projects/proj-A");
        assert_eq!(
            name.latest().to_string(),
            "projects/proj-A/secrets/k1/versions/latest"
        );
    }

    #[test]
    fn test_parse_service_name() {
        let name: SecretName = "projects/123456789/secrets/k1".parse().unwrap();
        assert_eq!(name.project(), "123456789");
        assert_eq!(name.secret(), "k1");

        assert!("projects/p/secrets/".parse::<SecretName>().is_err());
        assert!("projects/p/secrets/k1/versions/3".parse::<SecretName>().is_err());
        assert!("k1".parse::<SecretName>().is_err());
    }

    #[test]
    fn test_urls() {
        let name = SecretName::new("proj-A", "k1");
        assert_eq!(
            name.url(&endpoint(), "").unwrap().as_str(),
            "https://secretmanager.googleapis.com/v1/projects/proj-A/secrets/k1"
        );
        assert_eq!(
            name.url(&endpoint(), ":addVersion").unwrap().as_str(),
            "https://secretmanager.googleapis.com/v1/projects/proj-A/secrets/k1:addVersion"
        );
        assert_eq!(
            name.collection_url(&endpoint()).unwrap().as_str(),
            "https://secretmanager.googleapis.com/v1/projects/proj-A/secrets"
        );
        assert_eq!(
            name.latest().url(&endpoint(), ":access").unwrap().as_str(),
            "https://secretmanager.googleapis.com/v1/projects/proj-A/secrets/k1/versions/latest:access"
        );
    }

    #[test]
    fn test_trailing_slash_endpoint() {
        let endpoint = Url::parse("http://127.0.0.1:8085/v1/").unwrap();
        let name = SecretName::new("p", "k1");
        assert_eq!(
            name.url(&endpoint, "").unwrap().as_str(),
            "http://127.0.0.1:8085/v1/projects/p/secrets/k1"
        );
    }

    #[test]
    fn test_segments_are_encoded() {
        let name = SecretName::new("p", "a/b?c");
        assert_eq!(
            name.url(&endpoint(), "").unwrap().as_str(),
            "https://secretmanager.googleapis.com/v1/projects/p/secrets/a%2Fb%3Fc"
        );
    }
}
