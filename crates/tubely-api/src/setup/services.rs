//! Service wiring

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{
    FfmpegNormalizer, FfprobeInspector, MediaToolRunner, ThumbnailService, VideoUploadConfig,
    VideoUploadOrchestrator,
};
use tubely_storage::{Storage, UrlResolver};

use crate::auth::JwtService;
use crate::state::AppState;

/// Construct the media tools, upload services, and shared state.
pub async fn initialize_services(
    config: &Config,
    repository: Arc<dyn VideoRepository>,
    storage: Arc<dyn Storage>,
    urls: UrlResolver,
) -> Result<Arc<AppState>> {
    let runner = Arc::new(MediaToolRunner::new(
        config.max_concurrent_media_tools(),
        config.media_tool_timeout(),
    ));
    let inspector = FfprobeInspector::new(config.ffprobe_path().to_string(), runner.clone())
        .context("Invalid FFPROBE_PATH")?;
    let normalizer = FfmpegNormalizer::new(config.ffmpeg_path().to_string(), runner)
        .context("Invalid FFMPEG_PATH")?;

    let upload_config = VideoUploadConfig::from_config(config);
    tokio::fs::create_dir_all(&upload_config.temp_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload temp directory {}",
                upload_config.temp_dir.display()
            )
        })?;
    tokio::fs::create_dir_all(config.assets_root())
        .await
        .with_context(|| {
            format!(
                "Failed to create assets directory {}",
                config.assets_root().display()
            )
        })?;

    tracing::info!(
        ffprobe_path = %config.ffprobe_path(),
        ffmpeg_path = %config.ffmpeg_path(),
        max_concurrent_media_tools = config.max_concurrent_media_tools(),
        media_tool_timeout_secs = config.media_tool_timeout().as_secs(),
        temp_dir = %upload_config.temp_dir.display(),
        "Media tools configured"
    );

    let videos = VideoUploadOrchestrator::new(
        repository.clone(),
        storage.clone(),
        Arc::new(inspector),
        Arc::new(normalizer),
        urls.clone(),
        upload_config,
    );

    let thumbnails = ThumbnailService::new(
        repository.clone(),
        config.assets_root().clone(),
        config.assets_base_url(),
        config.max_thumbnail_size_bytes(),
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        repository,
        storage,
        videos,
        thumbnails,
        urls,
        jwt: JwtService::new(config.jwt_secret(), config.jwt_issuer()),
    }))
}
