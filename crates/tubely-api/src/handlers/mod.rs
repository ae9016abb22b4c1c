pub mod health;
pub mod multipart;
pub mod thumbnail_upload;
pub mod video_get;
pub mod video_upload;

use tubely_core::models::{Video, VideoResponse};
use tubely_storage::UrlResolver;

use crate::error::HttpAppError;

/// Build the client view of a video, resolving its stored URL value.
pub(crate) async fn resolve_video(
    urls: &UrlResolver,
    video: Video,
) -> Result<VideoResponse, HttpAppError> {
    let resolved = match video.video_url.as_deref() {
        Some(stored) => Some(urls.resolve(stored).await?),
        None => None,
    };
    Ok(VideoResponse::with_video_url(video, resolved))
}
