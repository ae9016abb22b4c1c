use async_trait::async_trait;
use tubely_core::models::Video;
use tubely_core::AppError;
use uuid::Uuid;

/// Access to video records.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch a video by id, `None` when it does not exist.
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Persist every mutable field of `video`.
    ///
    /// Fails with [`AppError::NotFound`] when the record no longer exists.
    async fn update_video(&self, video: &Video) -> Result<(), AppError>;

    /// Set only `video_url` and return the record as now stored.
    ///
    /// Other columns keep whatever value they hold at write time, so a
    /// concurrent change to another field is never undone.
    async fn set_video_url(&self, id: Uuid, video_url: &str) -> Result<Video, AppError>;

    /// Set only `thumbnail_url` and return the record as now stored.
    async fn set_thumbnail_url(&self, id: Uuid, thumbnail_url: &str) -> Result<Video, AppError>;

    /// Insert a new video record.
    async fn create_video(&self, video: &Video) -> Result<(), AppError>;
}
