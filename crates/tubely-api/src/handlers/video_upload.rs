use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::handlers::multipart::field_reader;
use crate::handlers::resolve_video;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::constants::VIDEO_FORM_FIELD;
use tubely_core::models::VideoResponse;
use tubely_core::AppError;
use uuid::Uuid;

/// `POST /api/video_upload/{video_id}`
///
/// Ownership is checked before the body is read, and the content type of the
/// `video` part before any of its bytes are staged.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let Path(video_id) = path?;
    let video = state.videos.authorize(video_id, user.user_id).await?;
    tracing::info!(video_id = %video_id, "Uploading video");

    let field = loop {
        match multipart.next_field().await? {
            Some(field) if field.name() == Some(VIDEO_FORM_FIELD) => break field,
            Some(_) => continue,
            None => {
                return Err(AppError::BadRequest(format!(
                    "Missing form field '{}'",
                    VIDEO_FORM_FIELD
                ))
                .into())
            }
        }
    };

    state.videos.accept_content_type(field.content_type())?;

    let mut reader = field_reader(field);
    let video = state.videos.ingest(video, &mut reader).await?;

    let response = resolve_video(&state.urls, video).await?;
    Ok(Json(response))
}
