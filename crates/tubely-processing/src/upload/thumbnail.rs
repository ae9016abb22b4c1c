//! Thumbnail uploads.
//!
//! Thumbnails are small, so they skip the media tools and storage backend:
//! the image is staged directly under the assets root and served from there.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tubely_core::constants::THUMBNAIL_CONTENT_TYPES;
use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_db::VideoRepository;
use tubely_storage::keys::asset_file_name;
use uuid::Uuid;

use crate::media_type::parse_media_type;
use crate::upload::ownership::authorize_owner;
use crate::upload::staging::stage_upload;

#[derive(Clone)]
pub struct ThumbnailService {
    repository: Arc<dyn VideoRepository>,
    assets_root: PathBuf,
    assets_base_url: String,
    max_bytes: u64,
}

impl ThumbnailService {
    pub fn new(
        repository: Arc<dyn VideoRepository>,
        assets_root: impl Into<PathBuf>,
        assets_base_url: impl Into<String>,
        max_bytes: u64,
    ) -> Self {
        Self {
            repository,
            assets_root: assets_root.into(),
            assets_base_url: assets_base_url.into(),
            max_bytes,
        }
    }

    pub async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        authorize_owner(self.repository.as_ref(), video_id, user_id).await
    }

    /// File extension for an accepted image type.
    pub fn accept_content_type(&self, declared: Option<&str>) -> Result<&'static str, AppError> {
        let declared = declared.ok_or_else(|| {
            AppError::UnsupportedMediaType("Missing thumbnail content type".to_string())
        })?;
        let media_type = parse_media_type(declared).ok_or_else(|| {
            AppError::UnsupportedMediaType(format!("Unable to parse media type: {}", declared))
        })?;

        THUMBNAIL_CONTENT_TYPES
            .iter()
            .find(|(content_type, _)| *content_type == media_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                AppError::UnsupportedMediaType(format!(
                    "Invalid file type {}, expected image/jpeg or image/png",
                    media_type
                ))
            })
    }

    /// Write the image under the assets root and point the record at it.
    #[tracing::instrument(skip(self, video, reader), fields(video_id = %video.id))]
    pub async fn store<R>(
        &self,
        video: Video,
        extension: &str,
        reader: &mut R,
    ) -> Result<Video, AppError>
    where
        R: AsyncRead + Unpin + Send + ?Sized,
    {
        tokio::fs::create_dir_all(&self.assets_root).await?;

        let staged = stage_upload(reader, self.max_bytes, &self.assets_root, extension).await?;
        let size_bytes = staged.size_bytes();
        let file_name = asset_file_name(extension);
        staged.persist(&self.assets_root.join(&file_name))?;

        let url = format!(
            "{}/{}",
            self.assets_base_url.trim_end_matches('/'),
            file_name
        );
        let video = match self.repository.set_thumbnail_url(video.id, &url).await {
            Ok(video) => video,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    file_name = %file_name,
                    "Thumbnail written but record update failed; asset is orphaned"
                );
                return Err(AppError::RecordUpdateFailed(format!(
                    "Unable to update video: {}",
                    e
                )));
            }
        };

        tracing::info!(
            thumbnail_url = %url,
            size_bytes = size_bytes,
            "Thumbnail stored"
        );

        Ok(video)
    }
}
