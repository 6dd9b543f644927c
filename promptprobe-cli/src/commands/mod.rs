//! CLI command implementations.

pub mod ask;
pub mod check;
pub mod config;
pub mod models;
pub mod plan;

use anyhow::Result;
use promptprobe_fetch::FallbackProber;
use promptprobe_store::Config;
use std::sync::Arc;
use tracing::debug;

/// Builds a prober from the configuration, loading the API key once.
pub async fn build_prober(config: &Config) -> Result<FallbackProber> {
    let transport = Arc::new(config.http_client()?);

    debug!(
        source = ?config.credential.source,
        name = %config.credential.name,
        "Building prober"
    );

    let prober = FallbackProber::builder()
        .transport(transport)
        .plan(config.plan()?)
        .settings(config.probe_settings())
        .credential_name(config.credential.name.as_str())
        .build(config.credential_source().as_ref())
        .await?;

    Ok(prober)
}
