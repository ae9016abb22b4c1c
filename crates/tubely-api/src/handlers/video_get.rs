use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::handlers::resolve_video;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::models::VideoResponse;
use tubely_processing::upload::authorize_owner;
use uuid::Uuid;

/// `GET /api/videos/{video_id}`
///
/// In signed mode every call mints a fresh presigned URL from the stored
/// `bucket,key` reference.
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let Path(video_id) = path?;
    let video = authorize_owner(state.repository.as_ref(), video_id, user.user_id).await?;
    let response = resolve_video(&state.urls, video).await?;
    Ok(Json(response))
}
