//! Application setup and initialization
//!
//! Builds every component from the validated configuration and injects it
//! explicitly; nothing below reads the environment again.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    // Record store
    let repository = database::setup_repository(&config).await?;

    // Object storage and URL resolution
    let (storage, urls) = storage::setup_storage(&config).await?;

    // Media tools, orchestrator, thumbnails
    let state = services::initialize_services(&config, repository, storage, urls).await?;

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
