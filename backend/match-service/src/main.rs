use anyhow::Context;
use match_service::{Config, MatchEngine};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load config
    let config = Config::from_env().context("Failed to load config")?;

    info!(
        service = %config.service.name,
        catalog = %config.catalog.path.display(),
        "Starting catalog verification"
    );

    let engine = Arc::new(
        MatchEngine::from_config(&config)
            .with_context(|| format!("Failed to open catalog {}", config.catalog.path.display()))?,
    );

    // Full decode pass on the blocking pool
    let verifier = engine.clone();
    let stats = tokio::task::spawn_blocking(move || verifier.verify_catalog())
        .await
        .context("Verification task panicked")?
        .context("Catalog scan failed")?;

    info!(
        decoded = stats.decoded,
        skipped = stats.skipped,
        truncated_tail = stats.truncated_tail,
        vocabulary_size = engine.vocabulary().len(),
        "Catalog ready"
    );

    Ok(())
}
