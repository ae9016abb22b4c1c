use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tubely_core::models::Video;
use tubely_core::AppError;
use uuid::Uuid;

use super::repository::VideoRepository;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            "SELECT id, created_at, updated_at, title, description, thumbnail_url, video_url, user_id \
             FROM videos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "update", db.record_id = %video.id))]
    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE videos SET title = $2, description = $3, thumbnail_url = $4, video_url = $5, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", video.id)));
        }

        tracing::debug!(video_id = %video.id, "Video record updated");
        Ok(())
    }

    #[tracing::instrument(skip(self, video_url), fields(db.table = "videos", db.operation = "update"))]
    async fn set_video_url(&self, id: Uuid, video_url: &str) -> Result<Video, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            "UPDATE videos SET video_url = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, created_at, updated_at, title, description, thumbnail_url, video_url, user_id",
        )
        .bind(id)
        .bind(video_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        tracing::debug!(video_id = %id, "Video URL updated");
        Ok(video)
    }

    #[tracing::instrument(skip(self, thumbnail_url), fields(db.table = "videos", db.operation = "update"))]
    async fn set_thumbnail_url(&self, id: Uuid, thumbnail_url: &str) -> Result<Video, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            "UPDATE videos SET thumbnail_url = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, created_at, updated_at, title, description, thumbnail_url, video_url, user_id",
        )
        .bind(id)
        .bind(thumbnail_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        tracing::debug!(video_id = %id, "Thumbnail URL updated");
        Ok(video)
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "insert", db.record_id = %video.id))]
    async fn create_video(&self, video: &Video) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO videos (id, created_at, updated_at, title, description, thumbnail_url, video_url, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(video.id)
        .bind(video.created_at)
        .bind(video.updated_at)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
