//! Test helpers: in-process fakes for the media tools, storage, and record store.
//!
//! Run from workspace root: `cargo test -p tubely-processing --test video_upload_test`.

pub mod fakes;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tubely_core::models::Video;
use tubely_core::UrlMode;
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::{VideoUploadConfig, VideoUploadOrchestrator};
use tubely_storage::UrlResolver;
use uuid::Uuid;

use fakes::{FakeInspector, FakeNormalizer, RecordingStorage};

pub const CDN_BASE: &str = "https://d111111abcdef8.cloudfront.net";

/// Orchestrator wired to fakes, with handles for assertions.
pub struct TestPipeline {
    pub orchestrator: VideoUploadOrchestrator,
    pub repository: Arc<dyn VideoRepository>,
    pub storage: Arc<RecordingStorage>,
    pub inspector: Arc<FakeInspector>,
    pub normalizer: Arc<FakeNormalizer>,
    pub temp_dir: TempDir,
}

impl TestPipeline {
    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Names of files left in the staging directory.
    pub fn leftover_files(&self) -> Vec<String> {
        std::fs::read_dir(self.temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    /// Insert a video owned by `owner` and return it.
    pub async fn create_video(&self, owner: Uuid) -> Video {
        let video = Video::new(owner, "Boots on the ground", Some("test".to_string()));
        self.repository.create_video(&video).await.unwrap();
        video
    }

    pub async fn stored_video(&self, id: Uuid) -> Video {
        self.repository.get_video(id).await.unwrap().unwrap()
    }
}

pub struct PipelineBuilder {
    mode: UrlMode,
    inspector: FakeInspector,
    normalizer: FakeNormalizer,
    storage: RecordingStorage,
    repository: Option<Arc<dyn VideoRepository>>,
    max_bytes: u64,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            mode: UrlMode::Static,
            inspector: FakeInspector::returning(1920, 1080),
            normalizer: FakeNormalizer::default(),
            storage: RecordingStorage::new("tubely-videos"),
            repository: None,
            max_bytes: 1024 * 1024,
        }
    }
}

impl PipelineBuilder {
    pub fn url_mode(mut self, mode: UrlMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn inspector(mut self, inspector: FakeInspector) -> Self {
        self.inspector = inspector;
        self
    }

    pub fn normalizer(mut self, normalizer: FakeNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn storage(mut self, storage: RecordingStorage) -> Self {
        self.storage = storage;
        self
    }

    pub fn repository(mut self, repository: Arc<dyn VideoRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn build(self) -> TestPipeline {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryVideoRepository::new()));
        let storage = Arc::new(self.storage);
        let inspector = Arc::new(self.inspector);
        let normalizer = Arc::new(self.normalizer);

        let public_base = match self.mode {
            UrlMode::Static => Some(CDN_BASE.to_string()),
            UrlMode::Signed => None,
        };
        let urls = UrlResolver::new(
            self.mode,
            public_base,
            Duration::from_secs(3600),
            storage.clone(),
        )
        .expect("Failed to create URL resolver");

        let orchestrator = VideoUploadOrchestrator::new(
            repository.clone(),
            storage.clone(),
            inspector.clone(),
            normalizer.clone(),
            urls,
            VideoUploadConfig {
                max_video_size_bytes: self.max_bytes,
                temp_dir: temp_dir.path().to_path_buf(),
            },
        );

        TestPipeline {
            orchestrator,
            repository,
            storage,
            inspector,
            normalizer,
            temp_dir,
        }
    }
}

/// Default pipeline: static URLs, 1920x1080 probe result, 1 MiB limit.
pub fn setup_pipeline() -> TestPipeline {
    PipelineBuilder::default().build()
}
