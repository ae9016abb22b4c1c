//! Video upload: probe, remux, and orchestration

pub mod inspector;
pub mod normalizer;
pub mod orchestration;

pub use inspector::FfprobeInspector;
pub use normalizer::{normalized_path, FfmpegNormalizer};
pub use orchestration::{UploadRequest, UploadStage, VideoUploadConfig, VideoUploadOrchestrator};
