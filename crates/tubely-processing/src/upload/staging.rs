//! Stream staging: copy an inbound upload to a uniquely named local temp file.

use std::fmt;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tubely_core::constants::UPLOAD_TEMP_PREFIX;

use crate::error::StagingError;

const COPY_CHUNK_BYTES: usize = 64 * 1024;

/// Marker carried inside an `io::Error` by sources that enforce their own
/// size limit, so staging can report it as too large instead of a read failure.
#[derive(Debug)]
pub struct SizeLimitExceeded;

impl fmt::Display for SizeLimitExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request body size limit exceeded")
    }
}

impl std::error::Error for SizeLimitExceeded {}

/// Local copy of an upload, deleted when dropped.
///
/// The write handle is closed once staging finishes; consumers open the
/// file by path.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    size_bytes: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Move the staged file to `dest`, keeping it on disk.
    ///
    /// `dest` must be on the same filesystem as the staging directory.
    pub fn persist(self, dest: &Path) -> std::io::Result<()> {
        self.temp.persist(dest).map(|_| ()).map_err(|e| e.error)
    }
}

fn is_source_limit(err: &std::io::Error) -> bool {
    err.get_ref()
        .is_some_and(|inner| inner.is::<SizeLimitExceeded>())
}

/// Copy `reader` into a new temp file under `temp_dir`, failing once more than
/// `max_bytes` have been read.
///
/// The copy is incremental; the payload is never held in memory. On any
/// error the partially written file is removed before returning.
pub async fn stage_upload<R>(
    reader: &mut R,
    max_bytes: u64,
    temp_dir: &Path,
    suffix: &str,
) -> Result<StagedFile, StagingError>
where
    R: AsyncRead + Unpin + Send + ?Sized,
{
    let temp = tempfile::Builder::new()
        .prefix(UPLOAD_TEMP_PREFIX)
        .suffix(suffix)
        .tempfile_in(temp_dir)
        .map_err(StagingError::Io)?;
    let std_file = temp.reopen().map_err(StagingError::Io)?;
    let mut file = tokio::fs::File::from_std(std_file);

    let mut buf = vec![0u8; COPY_CHUNK_BYTES];
    let mut total: u64 = 0;
    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if is_source_limit(&e) => {
                return Err(StagingError::PayloadTooLarge { limit: max_bytes })
            }
            Err(e) => return Err(StagingError::SourceRead(e)),
        };

        total += n as u64;
        if total > max_bytes {
            tracing::debug!(
                limit = max_bytes,
                received = total,
                "Upload exceeded size limit while staging"
            );
            return Err(StagingError::PayloadTooLarge { limit: max_bytes });
        }

        file.write_all(&buf[..n]).await.map_err(StagingError::Io)?;
    }

    file.flush().await.map_err(StagingError::Io)?;
    drop(file);

    tracing::debug!(
        path = %temp.path().display(),
        size_bytes = total,
        "Upload staged"
    );

    Ok(StagedFile {
        temp,
        size_bytes: total,
    })
}
