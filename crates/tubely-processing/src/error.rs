use std::io;
use thiserror::Error;
use tubely_core::AppError;

/// Failures while copying an inbound stream to local disk
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },

    #[error("failed to read upload stream: {0}")]
    SourceRead(#[source] io::Error),

    #[error("failed to write staged file: {0}")]
    Io(#[source] io::Error),
}

/// Failures from the external media tools
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("ffprobe failed: {0}")]
    ProbeExecutionFailed(String),

    #[error("ffprobe output invalid: {0}")]
    ProbeOutputInvalid(String),

    #[error("ffprobe found no media streams")]
    NoMediaStreams,

    #[error("ffmpeg remux failed: {0}")]
    RemuxExecutionFailed(String),

    #[error("{tool} did not finish within {timeout_secs}s")]
    ToolTimeout { tool: String, timeout_secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<StagingError> for AppError {
    fn from(err: StagingError) -> Self {
        match err {
            StagingError::PayloadTooLarge { limit } => AppError::PayloadTooLarge(format!(
                "Upload exceeds the maximum size of {} MB",
                limit / (1024 * 1024)
            )),
            StagingError::SourceRead(e) => {
                AppError::BadRequest(format!("Upload stream interrupted: {}", e))
            }
            StagingError::Io(e) => AppError::LocalIo(e),
        }
    }
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            timeout @ ProcessingError::ToolTimeout { .. } => {
                AppError::ToolTimeout(timeout.to_string())
            }
            ProcessingError::Io(e) => AppError::LocalIo(e),
            other => AppError::ExternalTool(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::{ErrorCategory, ErrorMetadata};

    #[test]
    fn test_tool_failures_are_external_tool_category() {
        for err in [
            ProcessingError::ProbeExecutionFailed("exit status 1".to_string()),
            ProcessingError::ProbeOutputInvalid("eof".to_string()),
            ProcessingError::NoMediaStreams,
            ProcessingError::RemuxExecutionFailed("exit status 1".to_string()),
            ProcessingError::ToolTimeout {
                tool: "ffmpeg".to_string(),
                timeout_secs: 600,
            },
        ] {
            let app: AppError = err.into();
            assert_eq!(app.category(), ErrorCategory::ExternalToolFailure);
            assert_eq!(app.http_status_code(), 500);
        }
    }

    #[test]
    fn test_payload_too_large_is_bad_input() {
        let app: AppError = StagingError::PayloadTooLarge { limit: 1 << 30 }.into();
        assert_eq!(app.category(), ErrorCategory::BadInput);
        assert_eq!(app.http_status_code(), 400);
        assert!(app.client_message().contains("1024 MB"));
    }
}
