//! Generic secret store abstraction.

use async_trait::async_trait;

/// A store of named, versioned secrets where reads resolve to the latest
/// version.
///
/// Implemented by [`SecretClient`](crate::SecretClient); code that only
/// needs get/set/delete can depend on this trait instead.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Error returned by every operation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Payload of the latest version of `name`.
    async fn get(&self, name: &str) -> Result<Vec<u8>, Self::Error>;

    /// Append `value` as the new latest version of `name`, creating the
    /// secret if needed.
    async fn set(&self, name: &str, value: &[u8]) -> Result<(), Self::Error>;

    /// Remove `name` and all of its versions.
    async fn delete(&self, name: &str) -> Result<(), Self::Error>;
}
