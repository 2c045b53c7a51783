//! Secret Manager REST v1 wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A secret container as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    /// Resource name, set by the service
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Where versions of this secret are stored
    pub replication: Replication,
    /// Creation time, set by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    /// Entity tag, set by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl Secret {
    /// A new secret body for a create request.
    #[must_use]
    pub const fn new(replication: Replication) -> Self {
        Self {
            name: String::new(),
            replication,
            create_time: None,
            etag: None,
        }
    }
}

/// Replication policy of a secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Replication {
    /// The service chooses where to store versions
    Automatic {},
    /// Versions are stored in exactly the listed locations
    UserManaged {
        /// Replica locations, in configured order
        replicas: Vec<Replica>,
    },
}

impl Replication {
    /// Automatic replication when `locations` is empty, otherwise
    /// user-managed replication over exactly `locations`.
    #[must_use]
    pub fn for_locations(locations: &[String]) -> Self {
        if locations.is_empty() {
            Self::Automatic {}
        } else {
            Self::UserManaged {
                replicas: locations
                    .iter()
                    .map(|location| Replica {
                        location: location.clone(),
                    })
                    .collect(),
            }
        }
    }
}

/// One replica location of a user-managed secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replica {
    /// Location id, e.g. `europe-west1`
    pub location: String,
}

/// Opaque secret bytes, base64 encoded on the wire.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretPayload {
    /// Payload bytes
    #[serde(default, with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPayload")
            .field("data", &"[REDACTED]")
            .field("len", &self.data.len())
            .finish()
    }
}

/// Body of an `addVersion` request.
#[derive(Debug, Serialize)]
pub struct AddSecretVersionRequest<'a> {
    /// Payload of the new version
    pub payload: SecretPayloadRef<'a>,
}

/// Borrowed form of [`SecretPayload`] for request bodies.
#[derive(Serialize)]
pub struct SecretPayloadRef<'a> {
    /// Payload bytes
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub data: &'a [u8],
}

impl fmt::Debug for SecretPayloadRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPayloadRef")
            .field("data", &"[REDACTED]")
            .field("len", &self.data.len())
            .finish()
    }
}

/// Metadata of a secret version as returned by `addVersion`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretVersion {
    /// Resource name, `projects/*/secrets/*/versions/*`
    pub name: String,
    /// Creation time
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
    /// `ENABLED`, `DISABLED` or `DESTROYED`
    #[serde(default)]
    pub state: Option<String>,
}

/// Response of `versions/*:access`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessSecretVersionResponse {
    /// Resolved version name
    #[serde(default)]
    pub name: String,
    /// Version payload
    pub payload: SecretPayload,
}

mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(data: impl AsRef<[u8]>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        STANDARD.decode(encoded).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_automatic_replication_shape() {
        let secret = Secret::new(Replication::for_locations(&[]));
        assert_eq!(
            serde_json::to_value(&secret).unwrap(),
            json!({"replication": {"automatic": {}}})
        );
    }

    #[test]
    fn test_user_managed_replication_shape() {
        let locations = vec!["europe-west1".to_string(), "europe-west6".to_string()];
        let secret = Secret::new(Replication::for_locations(&locations));
        assert_eq!(
            serde_json::to_value(&secret).unwrap(),
            json!({"replication": {"userManaged": {"replicas": [
                {"location": "europe-west1"},
                {"location": "europe-west6"}
            ]}}})
        );
    }

    #[test]
    fn test_parse_service_secret() {
        let body = json!({
            "name": "projects/123/secrets/k1",
            "replication": {"automatic": {"customerManagedEncryption": null}},
            "createTime": "2024-05-01T10:00:00.123456Z",
            "etag": "\"16186a1b9ed8a8\""
        });
        let secret: Secret = serde_json::from_value(body).unwrap();
        assert_eq!(secret.name, "projects/123/secrets/k1");
        assert_eq!(secret.replication, Replication::Automatic {});
        assert!(secret.create_time.is_some());
    }

    #[test]
    fn test_payload_base64() {
        let data = [0u8, 159, 146, 150, 255];
        let request = AddSecretVersionRequest {
            payload: SecretPayloadRef { data: &data },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"payload": {"data": "AJ+Slv8="}})
        );

        let response: AccessSecretVersionResponse = serde_json::from_value(json!({
            "name": "projects/123/secrets/k1/versions/2",
            "payload": {"data": "AJ+Slv8=", "dataCrc32c": "1234"}
        }))
        .unwrap();
        assert_eq!(response.payload.data, data);
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let result: Result<SecretPayload, _> =
            serde_json::from_value(json!({"data": "not base64!"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_payload_debug_is_redacted() {
        let payload = SecretPayload {
            data: b"hunter2".to_vec(),
        };
        let debug = format!("{payload:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("len: 7"));
    }
}
