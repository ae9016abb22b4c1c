//! Tubely media processing
//!
//! The video upload pipeline: stream staging, ffprobe inspection, ffmpeg
//! fast-start remux, and the orchestrator that ties them to object storage
//! and the video record store. Thumbnail uploads reuse the staging step.

pub mod error;
pub mod media_type;
pub mod scratch;
pub mod tool;
pub mod traits;
pub mod upload;
pub mod video;

pub use error::{ProcessingError, StagingError};
pub use scratch::ScratchFile;
pub use tool::{MediaToolRunner, ToolOutput};
pub use traits::{MediaInspector, MediaNormalizer, VideoGeometry};
pub use upload::{stage_upload, SizeLimitExceeded, StagedFile, ThumbnailService};
pub use video::{
    normalized_path, FfmpegNormalizer, FfprobeInspector, UploadRequest, UploadStage,
    VideoUploadConfig, VideoUploadOrchestrator,
};
