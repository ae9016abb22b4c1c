use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_db::VideoRepository;
use uuid::Uuid;

/// Load a video and check that `user_id` owns it.
///
/// Runs before any upload byte is read.
pub async fn authorize_owner(
    repository: &dyn VideoRepository,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<Video, AppError> {
    let video = repository
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user_id) {
        tracing::debug!(
            video_id = %video_id,
            user_id = %user_id,
            owner_id = %video.user_id,
            "Upload rejected for non-owner"
        );
        return Err(AppError::Unauthorized(
            "You are not the owner of this video".to_string(),
        ));
    }

    Ok(video)
}
