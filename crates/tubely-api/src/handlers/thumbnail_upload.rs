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
use tubely_core::constants::THUMBNAIL_FORM_FIELD;
use tubely_core::models::VideoResponse;
use tubely_core::AppError;
use uuid::Uuid;

/// `POST /api/thumbnail_upload/{video_id}`
#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let Path(video_id) = path?;
    let video = state.thumbnails.authorize(video_id, user.user_id).await?;
    tracing::info!(video_id = %video_id, "Uploading thumbnail");

    let field = loop {
        match multipart.next_field().await? {
            Some(field) if field.name() == Some(THUMBNAIL_FORM_FIELD) => break field,
            Some(_) => continue,
            None => {
                return Err(AppError::BadRequest(format!(
                    "Missing form field '{}'",
                    THUMBNAIL_FORM_FIELD
                ))
                .into())
            }
        }
    };

    let extension = state.thumbnails.accept_content_type(field.content_type())?;

    let mut reader = field_reader(field);
    let video = state
        .thumbnails
        .store(video, extension, &mut reader)
        .await?;

    let response = resolve_video(&state.urls, video).await?;
    Ok(Json(response))
}
