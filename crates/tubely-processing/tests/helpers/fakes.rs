use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::{
    normalized_path, MediaInspector, MediaNormalizer, ProcessingError, ScratchFile, VideoGeometry,
};
use tubely_storage::{Storage, StorageBackend, StorageError, StorageResult};
use uuid::Uuid;

/// Prefix the fake normalizer puts in front of the staged bytes.
pub const NORMALIZED_MARKER: &[u8] = b"normalized:";

/// Record write performed while the probe runs, standing in for another request.
struct ThumbnailWrite {
    repository: Arc<dyn VideoRepository>,
    video_id: Uuid,
    thumbnail_url: String,
}

pub struct FakeInspector {
    geometry: Option<VideoGeometry>,
    calls: AtomicUsize,
    seen_paths: Mutex<Vec<PathBuf>>,
    thumbnail_write: Mutex<Option<ThumbnailWrite>>,
    panic: bool,
}

impl FakeInspector {
    pub fn returning(width: u32, height: u32) -> Self {
        Self {
            geometry: Some(VideoGeometry { width, height }),
            calls: AtomicUsize::new(0),
            seen_paths: Mutex::new(Vec::new()),
            thumbnail_write: Mutex::new(None),
            panic: false,
        }
    }

    /// Behaves like ffprobe exiting non-zero.
    pub fn failing() -> Self {
        Self {
            geometry: None,
            calls: AtomicUsize::new(0),
            seen_paths: Mutex::new(Vec::new()),
            thumbnail_write: Mutex::new(None),
            panic: false,
        }
    }

    /// Panics mid-probe, after the upload has been staged.
    pub fn panicking() -> Self {
        Self {
            panic: true,
            ..Self::failing()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_paths(&self) -> Vec<PathBuf> {
        self.seen_paths.lock().unwrap().clone()
    }

    /// Set the thumbnail of `video_id` while the next probe is in flight.
    pub fn write_thumbnail_during_probe(
        &self,
        repository: Arc<dyn VideoRepository>,
        video_id: Uuid,
        thumbnail_url: &str,
    ) {
        *self.thumbnail_write.lock().unwrap() = Some(ThumbnailWrite {
            repository,
            video_id,
            thumbnail_url: thumbnail_url.to_string(),
        });
    }
}

#[async_trait]
impl MediaInspector for FakeInspector {
    async fn inspect(&self, path: &Path) -> Result<VideoGeometry, ProcessingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_paths.lock().unwrap().push(path.to_path_buf());
        assert!(path.exists(), "inspected file must exist");
        if self.panic {
            panic!("ffprobe output parser blew up");
        }
        let write = self.thumbnail_write.lock().unwrap().take();
        if let Some(write) = write {
            write
                .repository
                .set_thumbnail_url(write.video_id, &write.thumbnail_url)
                .await
                .unwrap();
        }
        self.geometry.ok_or_else(|| {
            ProcessingError::ProbeExecutionFailed("exit status: 1 (Invalid data found)".to_string())
        })
    }
}

/// Writes `normalized:` + input bytes next to the input, as ffmpeg would.
#[derive(Default)]
pub struct FakeNormalizer {
    calls: AtomicUsize,
    fail: bool,
}

impl FakeNormalizer {
    /// Leaves a partial output behind and fails, like ffmpeg dying mid-remux.
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaNormalizer for FakeNormalizer {
    async fn normalize(&self, input: &Path) -> Result<ScratchFile, ProcessingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let output = ScratchFile::new(normalized_path(input));
        if self.fail {
            tokio::fs::write(output.path(), b"partial moov").await?;
            return Err(ProcessingError::RemuxExecutionFailed(
                "exit status: 1 (moov atom not found)".to_string(),
            ));
        }
        let mut data = NORMALIZED_MARKER.to_vec();
        data.extend(tokio::fs::read(input).await?);
        tokio::fs::write(output.path(), data).await?;
        Ok(output)
    }
}

/// Yields `data`, then fails as if the client connection dropped.
pub struct InterruptedReader {
    data: io::Cursor<Vec<u8>>,
}

impl InterruptedReader {
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: io::Cursor::new(data.to_vec()),
        }
    }
}

impl AsyncRead for InterruptedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.data.position() < self.data.get_ref().len() as u64 {
            return Pin::new(&mut self.data).poll_read(cx, buf);
        }
        Poll::Ready(Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        )))
    }
}

#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

pub enum StorageBehavior {
    Accept,
    Unavailable,
    Reject,
}

pub struct RecordingStorage {
    bucket: String,
    behavior: StorageBehavior,
    puts: Mutex<Vec<RecordedPut>>,
}

impl RecordingStorage {
    pub fn new(bucket: &str) -> Self {
        Self::with_behavior(bucket, StorageBehavior::Accept)
    }

    pub fn with_behavior(bucket: &str, behavior: StorageBehavior) -> Self {
        Self {
            bucket: bucket.to_string(),
            behavior,
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn puts(&self) -> Vec<RecordedPut> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        content_type: &str,
    ) -> StorageResult<u64> {
        match self.behavior {
            StorageBehavior::Accept => {}
            StorageBehavior::Unavailable => {
                return Err(StorageError::Unavailable("connection refused".to_string()))
            }
            StorageBehavior::Reject => {
                return Err(StorageError::Rejected("access denied".to_string()))
            }
        }

        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;
        let size = data.len() as u64;
        self.puts.lock().unwrap().push(RecordedPut {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            data,
        });
        Ok(size)
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(format!(
            "https://{}.s3.us-east-1.amazonaws.com/{}?X-Amz-Expires={}",
            bucket,
            key,
            expires_in.as_secs()
        ))
    }

    fn default_bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Record store whose updates always fail.
#[derive(Default)]
pub struct FailingUpdateRepository {
    inner: InMemoryVideoRepository,
}

#[async_trait]
impl VideoRepository for FailingUpdateRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        self.inner.get_video(id).await
    }

    async fn update_video(&self, _video: &Video) -> Result<(), AppError> {
        Err(AppError::Internal("database is read-only".to_string()))
    }

    async fn set_video_url(&self, _id: Uuid, _video_url: &str) -> Result<Video, AppError> {
        Err(AppError::Internal("database is read-only".to_string()))
    }

    async fn set_thumbnail_url(&self, _id: Uuid, _url: &str) -> Result<Video, AppError> {
        Err(AppError::Internal("database is read-only".to_string()))
    }

    async fn create_video(&self, video: &Video) -> Result<(), AppError> {
        self.inner.create_video(video).await
    }
}
