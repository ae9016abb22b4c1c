//! Bounded execution of external media tools.
//!
//! Every ffprobe/ffmpeg invocation goes through one shared [`MediaToolRunner`]
//! so the number of concurrent child processes is capped process-wide, and a
//! tool that runs past its deadline is killed.

use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::error::ProcessingError;

/// Captured result of a finished tool run
#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Last few lines of stderr, for error messages.
    pub fn stderr_tail(&self) -> String {
        let text = String::from_utf8_lossy(&self.stderr);
        let lines: Vec<&str> = text.lines().rev().take(5).collect();
        lines.into_iter().rev().collect::<Vec<_>>().join(" | ")
    }
}

/// Outcome of a tool run that did not complete
#[derive(Debug)]
pub enum ToolFailure {
    Spawn(std::io::Error),
    TimedOut(Duration),
}

/// Runs external tools with a concurrency cap and a deadline.
#[derive(Clone)]
pub struct MediaToolRunner {
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl MediaToolRunner {
    pub fn new(max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `program` with `args`, waiting for a free slot first.
    ///
    /// The child is killed if it outlives the deadline or if the returned
    /// future is dropped.
    pub async fn run<I, S>(&self, program: &str, args: I) -> Result<ToolOutput, ToolFailure>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let _permit = self.permits.acquire().await.map_err(|_| {
            ToolFailure::Spawn(std::io::Error::other("media tool runner is shut down"))
        })?;

        let start = std::time::Instant::now();
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(ToolFailure::Spawn)?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(ToolFailure::Spawn)?,
            Err(_) => {
                tracing::warn!(
                    program = %program,
                    timeout_secs = self.timeout.as_secs(),
                    "Media tool exceeded deadline, killed"
                );
                return Err(ToolFailure::TimedOut(self.timeout));
            }
        };

        tracing::debug!(
            program = %program,
            exit_code = ?output.status.code(),
            duration_ms = start.elapsed().as_millis(),
            "Media tool finished"
        );

        Ok(ToolOutput {
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Map a runner failure to the error of the tool that was being run.
pub(crate) fn failure_to_error(
    tool: &str,
    failure: ToolFailure,
    on_spawn: fn(String) -> ProcessingError,
) -> ProcessingError {
    match failure {
        ToolFailure::Spawn(e) => on_spawn(format!("could not run {}: {}", tool, e)),
        ToolFailure::TimedOut(after) => ProcessingError::ToolTimeout {
            tool: tool.to_string(),
            timeout_secs: after.as_secs(),
        },
    }
}

/// Reject tool paths containing shell metacharacters or traversal.
pub(crate) fn validate_tool_path(path: &str) -> Result<(), ProcessingError> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() || path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(ProcessingError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid tool path: {:?}", path),
        )));
    }
    if path.contains("..") {
        return Err(ProcessingError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("tool path contains directory traversal: {:?}", path),
        )));
    }
    Ok(())
}
