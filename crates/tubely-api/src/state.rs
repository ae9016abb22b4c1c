//! Application state shared by every handler.
//!
//! Everything in here is immutable after startup or safe for concurrent use,
//! so concurrent uploads share no mutable state.

use crate::auth::JwtService;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{ThumbnailService, VideoUploadOrchestrator};
use tubely_storage::{Storage, UrlResolver};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub repository: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn Storage>,
    pub videos: VideoUploadOrchestrator,
    pub thumbnails: ThumbnailService,
    pub urls: UrlResolver,
    pub jwt: JwtService,
}
