//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{create_storage, Storage, UrlResolver};

/// Build the storage backend and the URL resolver for the configured mode.
pub async fn setup_storage(config: &Config) -> Result<(Arc<dyn Storage>, UrlResolver)> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    let urls = UrlResolver::new(
        config.video_url_mode(),
        config.public_base_url().map(String::from),
        config.presign_expiry(),
        storage.clone(),
    )
    .context("Failed to initialize video URL resolver")?;

    tracing::info!(
        backend = %storage.backend_type(),
        bucket = %storage.default_bucket(),
        url_mode = %urls.mode(),
        "Storage initialized successfully"
    );

    Ok((storage, urls))
}
