//! Fast-start remux via ffmpeg

use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tubely_core::constants::NORMALIZED_SUFFIX;

use crate::error::ProcessingError;
use crate::scratch::ScratchFile;
use crate::tool::{failure_to_error, validate_tool_path, MediaToolRunner};
use crate::traits::MediaNormalizer;

/// Output path for the fast-start copy of `input`: the input path plus `.processing`.
pub fn normalized_path(input: &Path) -> PathBuf {
    let mut path = OsString::from(input.as_os_str());
    path.push(NORMALIZED_SUFFIX);
    PathBuf::from(path)
}

pub struct FfmpegNormalizer {
    ffmpeg_path: String,
    runner: Arc<MediaToolRunner>,
}

impl FfmpegNormalizer {
    pub fn new(ffmpeg_path: String, runner: Arc<MediaToolRunner>) -> Result<Self, ProcessingError> {
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            runner,
        })
    }
}

#[async_trait]
impl MediaNormalizer for FfmpegNormalizer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn normalize(&self, input: &Path) -> Result<ScratchFile, ProcessingError> {
        let start = std::time::Instant::now();
        let output_file = ScratchFile::new(normalized_path(input));

        // Stream copy only: container metadata moves to the front, bitstreams are untouched.
        let output = self
            .runner
            .run(
                &self.ffmpeg_path,
                [
                    OsStr::new("-y"),
                    OsStr::new("-i"),
                    input.as_os_str(),
                    OsStr::new("-c"),
                    OsStr::new("copy"),
                    OsStr::new("-movflags"),
                    OsStr::new("faststart"),
                    OsStr::new("-f"),
                    OsStr::new("mp4"),
                    output_file.path().as_os_str(),
                ],
            )
            .await
            .map_err(|f| failure_to_error("ffmpeg", f, ProcessingError::RemuxExecutionFailed))?;

        if !output.success() {
            return Err(ProcessingError::RemuxExecutionFailed(format!(
                "exited with {}: {}",
                output.status,
                output.stderr_tail()
            )));
        }

        let size_bytes = tokio::fs::metadata(output_file.path())
            .await
            .map_err(|e| {
                ProcessingError::RemuxExecutionFailed(format!("output file missing: {}", e))
            })?
            .len();

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            size_bytes,
            output = %output_file.path().display(),
            "Fast-start remux completed"
        );

        Ok(output_file)
    }
}
