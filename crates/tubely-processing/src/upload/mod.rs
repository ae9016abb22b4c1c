//! Upload plumbing shared by the video and thumbnail endpoints

pub mod ownership;
pub mod staging;
pub mod thumbnail;

pub use ownership::authorize_owner;
pub use staging::{stage_upload, SizeLimitExceeded, StagedFile};
pub use thumbnail::ThumbnailService;
