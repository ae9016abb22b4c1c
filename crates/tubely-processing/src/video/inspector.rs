//! Video inspector - stream geometry via ffprobe

use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use crate::error::ProcessingError;
use crate::tool::{failure_to_error, validate_tool_path, MediaToolRunner};
use crate::traits::{MediaInspector, VideoGeometry};

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    streams: Option<Vec<ProbeStream>>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

/// Extract the geometry of the first video stream from `ffprobe -print_format json` output.
///
/// A stream counts as video when it reports `codec_type: "video"` or, for
/// output without codec types, when it carries both dimensions.
pub fn parse_probe_output(stdout: &[u8]) -> Result<VideoGeometry, ProcessingError> {
    let probe: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::ProbeOutputInvalid(e.to_string()))?;

    let streams = probe.streams.ok_or_else(|| {
        ProcessingError::ProbeOutputInvalid("missing 'streams' field".to_string())
    })?;

    if streams.is_empty() {
        return Err(ProcessingError::NoMediaStreams);
    }

    streams
        .iter()
        .filter(|s| s.codec_type.as_deref().map_or(true, |t| t == "video"))
        .find_map(|s| match (s.width, s.height) {
            (Some(width), Some(height)) => Some(VideoGeometry { width, height }),
            _ => None,
        })
        .ok_or_else(|| {
            ProcessingError::ProbeOutputInvalid("no video stream with dimensions".to_string())
        })
}

pub struct FfprobeInspector {
    ffprobe_path: String,
    runner: Arc<MediaToolRunner>,
}

impl FfprobeInspector {
    pub fn new(ffprobe_path: String, runner: Arc<MediaToolRunner>) -> Result<Self, ProcessingError> {
        validate_tool_path(&ffprobe_path)?;
        Ok(Self {
            ffprobe_path,
            runner,
        })
    }
}

#[async_trait]
impl MediaInspector for FfprobeInspector {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn inspect(&self, path: &Path) -> Result<VideoGeometry, ProcessingError> {
        let start = std::time::Instant::now();

        let output = self
            .runner
            .run(
                &self.ffprobe_path,
                [
                    OsStr::new("-v"),
                    OsStr::new("error"),
                    OsStr::new("-print_format"),
                    OsStr::new("json"),
                    OsStr::new("-show_streams"),
                    path.as_os_str(),
                ],
            )
            .await
            .map_err(|f| failure_to_error("ffprobe", f, ProcessingError::ProbeExecutionFailed))?;

        if !output.success() {
            return Err(ProcessingError::ProbeExecutionFailed(format!(
                "exited with {}: {}",
                output.status,
                output.stderr_tail()
            )));
        }

        let geometry = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = geometry.width,
            height = geometry.height,
            aspect = %geometry.aspect_ratio(),
            "Video probe completed"
        );

        Ok(geometry)
    }
}
