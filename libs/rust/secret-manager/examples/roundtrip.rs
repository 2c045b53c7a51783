//! Store, read back and delete one secret.
//!
//! ```text
//! GOOGLE_CLOUD_PROJECT=my-project cargo run -p secret-manager-client --example roundtrip -- europe-west1
//! ```
//!
//! Trailing arguments are replica locations for the new secret.

use anyhow::{Context, Result, ensure};
use rust_common::{TracingConfig, init_tracing};
use secret_manager_client::{CallContext, SecretClient};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(&TracingConfig::default().with_service_name("secret-manager-roundtrip"))?;

    let project = std::env::var("GOOGLE_CLOUD_PROJECT").context("GOOGLE_CLOUD_PROJECT is not set")?;
    let locations: Vec<String> = std::env::args().skip(1).collect();

    let ctx = CallContext::background().with_timeout(Duration::from_secs(30));
    let client = SecretClient::connect(ctx, project, locations)?;

    let stamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
    let name = format!("roundtrip-{stamp}");
    let value = format!("secret-{stamp}");

    client.set(&name, value.as_bytes()).await?;
    let stored = client.get(&name).await?;
    ensure!(stored == value.as_bytes(), "read back a different payload");
    info!(secret = %name, len = stored.len(), "Round trip succeeded");

    client.delete(&name).await?;
    client.close();
    Ok(())
}
