//! In-process stand-ins for ffprobe, ffmpeg, and object storage.

use async_trait::async_trait;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tubely_processing::{
    normalized_path, MediaInspector, MediaNormalizer, ProcessingError, ScratchFile, VideoGeometry,
};
use tubely_storage::{Storage, StorageBackend, StorageResult};

pub const NORMALIZED_MARKER: &[u8] = b"faststart:";

pub struct FakeInspector {
    geometry: Option<VideoGeometry>,
    calls: AtomicUsize,
}

impl FakeInspector {
    pub fn returning(width: u32, height: u32) -> Self {
        Self {
            geometry: Some(VideoGeometry { width, height }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            geometry: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaInspector for FakeInspector {
    async fn inspect(&self, _path: &Path) -> Result<VideoGeometry, ProcessingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.geometry.ok_or_else(|| {
            ProcessingError::ProbeExecutionFailed("exit status: 1".to_string())
        })
    }
}

pub struct FakeNormalizer;

#[async_trait]
impl MediaNormalizer for FakeNormalizer {
    async fn normalize(&self, input: &Path) -> Result<ScratchFile, ProcessingError> {
        let output = ScratchFile::new(normalized_path(input));
        let mut data = NORMALIZED_MARKER.to_vec();
        data.extend(tokio::fs::read(input).await?);
        tokio::fs::write(output.path(), data).await?;
        Ok(output)
    }
}

#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

pub struct RecordingStorage {
    bucket: String,
    puts: Mutex<Vec<RecordedPut>>,
}

impl RecordingStorage {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
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
            "https://{}.s3.us-east-1.amazonaws.com/{}?X-Amz-Expires={}&X-Amz-Signature=fake",
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
