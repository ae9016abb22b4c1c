//! Capability interfaces for the external media tools.
//!
//! The orchestrator depends only on these traits, so it can be exercised
//! against in-process fakes.

use async_trait::async_trait;
use std::path::Path;
use tubely_core::AspectRatio;

use crate::error::ProcessingError;
use crate::scratch::ScratchFile;

/// Frame geometry of the first video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoGeometry {
    pub width: u32,
    pub height: u32,
}

impl VideoGeometry {
    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::classify(self.width, self.height)
    }
}

#[async_trait]
pub trait MediaInspector: Send + Sync {
    /// Read stream geometry from a local media file.
    async fn inspect(&self, path: &Path) -> Result<VideoGeometry, ProcessingError>;
}

#[async_trait]
pub trait MediaNormalizer: Send + Sync {
    /// Write a fast-start MP4 copy of `input` to a new path.
    ///
    /// The returned guard owns the new file and deletes it on drop.
    async fn normalize(&self, input: &Path) -> Result<ScratchFile, ProcessingError>;
}
