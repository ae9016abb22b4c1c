//! Video upload orchestration.
//!
//! One orchestration runs per request:
//! `Received -> Staged -> Inspected -> Normalized -> Uploaded -> Recorded -> Done`.
//! The staged and normalized files are owned by drop guards, so every exit
//! path removes them. Only the normalized file is ever sent to storage.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tubely_core::constants::{VIDEO_CONTENT_TYPE, VIDEO_EXTENSION};
use tubely_core::models::Video;
use tubely_core::{AppError, Config};
use tubely_db::VideoRepository;
use tubely_storage::keys::video_object_key;
use tubely_storage::{Storage, UrlResolver};
use uuid::Uuid;

use crate::media_type::parse_media_type;
use crate::traits::{MediaInspector, MediaNormalizer};
use crate::upload::ownership::authorize_owner;
use crate::upload::staging::stage_upload;

/// Settings for the video pipeline
#[derive(Debug, Clone)]
pub struct VideoUploadConfig {
    pub max_video_size_bytes: u64,
    /// Directory for staged uploads and their normalized copies
    pub temp_dir: PathBuf,
}

impl VideoUploadConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_video_size_bytes: config.max_video_size_bytes(),
            temp_dir: config.upload_temp_dir(),
        }
    }
}

/// Last stage an orchestration completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Received,
    Staged,
    Inspected,
    Normalized,
    Uploaded,
    Recorded,
    Done,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UploadStage::Received => "received",
            UploadStage::Staged => "staged",
            UploadStage::Inspected => "inspected",
            UploadStage::Normalized => "normalized",
            UploadStage::Uploaded => "uploaded",
            UploadStage::Recorded => "recorded",
            UploadStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// A complete upload as seen by the orchestrator
pub struct UploadRequest<R> {
    pub user_id: Uuid,
    pub video_id: Uuid,
    /// Content type declared for the uploaded part
    pub content_type: Option<String>,
    pub reader: R,
}

#[derive(Clone)]
pub struct VideoUploadOrchestrator {
    repository: Arc<dyn VideoRepository>,
    storage: Arc<dyn Storage>,
    inspector: Arc<dyn MediaInspector>,
    normalizer: Arc<dyn MediaNormalizer>,
    urls: UrlResolver,
    config: VideoUploadConfig,
}

impl VideoUploadOrchestrator {
    pub fn new(
        repository: Arc<dyn VideoRepository>,
        storage: Arc<dyn Storage>,
        inspector: Arc<dyn MediaInspector>,
        normalizer: Arc<dyn MediaNormalizer>,
        urls: UrlResolver,
        config: VideoUploadConfig,
    ) -> Self {
        Self {
            repository,
            storage,
            inspector,
            normalizer,
            urls,
            config,
        }
    }

    pub fn config(&self) -> &VideoUploadConfig {
        &self.config
    }

    /// Load the target video, failing unless `user_id` owns it.
    pub async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        authorize_owner(self.repository.as_ref(), video_id, user_id).await
    }

    /// Check the declared content type and return the file extension to use.
    ///
    /// Only MP4 is accepted.
    pub fn accept_content_type(&self, declared: Option<&str>) -> Result<&'static str, AppError> {
        let declared = declared.ok_or_else(|| {
            AppError::UnsupportedMediaType("Missing video content type".to_string())
        })?;
        let media_type = parse_media_type(declared).ok_or_else(|| {
            AppError::UnsupportedMediaType(format!("Unable to parse media type: {}", declared))
        })?;

        if media_type != VIDEO_CONTENT_TYPE {
            return Err(AppError::UnsupportedMediaType(format!(
                "Invalid file type {}, expected {}",
                media_type, VIDEO_CONTENT_TYPE
            )));
        }
        Ok(VIDEO_EXTENSION)
    }

    /// Authorize, validate, and run the whole pipeline.
    pub async fn upload<R>(&self, request: UploadRequest<R>) -> Result<Video, AppError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let video = self.authorize(request.video_id, request.user_id).await?;
        self.accept_content_type(request.content_type.as_deref())?;

        let mut reader = request.reader;
        self.ingest(video, &mut reader).await
    }

    /// Run the pipeline for an already authorized video and validated stream.
    ///
    /// Returns the video as persisted, with `video_url` holding the stored
    /// reference rather than a resolved URL.
    #[tracing::instrument(
        skip(self, video, reader),
        fields(video_id = %video.id, user_id = %video.user_id)
    )]
    pub async fn ingest<R>(&self, video: Video, reader: &mut R) -> Result<Video, AppError>
    where
        R: AsyncRead + Unpin + Send + ?Sized,
    {
        let start = std::time::Instant::now();
        let mut stage = UploadStage::Received;

        let result = self.run_pipeline(video, reader, &mut stage).await;

        match &result {
            Ok(video) => {
                tracing::info!(
                    video_url = video.video_url.as_deref().unwrap_or_default(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Video upload complete"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    completed_stage = %stage,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Video upload failed"
                );
            }
        }

        result
    }

    async fn run_pipeline<R>(
        &self,
        video: Video,
        reader: &mut R,
        stage: &mut UploadStage,
    ) -> Result<Video, AppError>
    where
        R: AsyncRead + Unpin + Send + ?Sized,
    {
        let staged = stage_upload(
            reader,
            self.config.max_video_size_bytes,
            &self.config.temp_dir,
            VIDEO_EXTENSION,
        )
        .await?;
        *stage = UploadStage::Staged;
        tracing::debug!(size_bytes = staged.size_bytes(), "Stage: staged");

        let geometry = self.inspector.inspect(staged.path()).await?;
        let aspect = geometry.aspect_ratio();
        *stage = UploadStage::Inspected;
        tracing::debug!(
            width = geometry.width,
            height = geometry.height,
            aspect = aspect.label(),
            "Stage: inspected"
        );

        let normalized = self.normalizer.normalize(staged.path()).await?;
        *stage = UploadStage::Normalized;
        tracing::debug!(path = %normalized.path().display(), "Stage: normalized");

        let key = video_object_key(aspect, VIDEO_EXTENSION);
        let bucket = self.storage.default_bucket().to_string();
        let file = normalized.open().await?;
        let size_bytes = self
            .storage
            .put_object(&bucket, &key, Box::pin(file), VIDEO_CONTENT_TYPE)
            .await?;
        *stage = UploadStage::Uploaded;
        tracing::debug!(bucket = %bucket, key = %key, size_bytes, "Stage: uploaded");

        let stored_url = self.urls.reference_for(&bucket, &key)?;
        let video = match self.repository.set_video_url(video.id, &stored_url).await {
            Ok(video) => video,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    "Object uploaded but record update failed; object is orphaned"
                );
                return Err(AppError::RecordUpdateFailed(format!(
                    "Failed to update video: {}",
                    e
                )));
            }
        };
        *stage = UploadStage::Recorded;

        drop(normalized);
        drop(staged);
        *stage = UploadStage::Done;

        Ok(video)
    }
}
