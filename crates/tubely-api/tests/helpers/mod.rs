//! Test helpers: build AppState and router for HTTP tests.
//!
//! Run from workspace root: `cargo test -p tubely-api --test videos_test`.
//! Media tools and object storage are replaced by in-process fakes; the
//! record store is the in-memory implementation.

#![allow(dead_code)]

pub mod fakes;

use axum_test::TestServer;
use chrono::Duration as TokenTtl;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::auth::JwtService;
use tubely_api::setup::routes;
use tubely_api::state::AppState;
use tubely_core::constants::DEFAULT_JWT_ISSUER;
use tubely_core::models::Video;
use tubely_core::{BaseConfig, Config, ServiceConfig, StorageBackend, UrlMode};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::{ThumbnailService, VideoUploadConfig, VideoUploadOrchestrator};
use tubely_storage::UrlResolver;
use uuid::Uuid;

use fakes::{FakeInspector, FakeNormalizer, RecordingStorage};

pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";
pub const CDN_BASE: &str = "https://d111111abcdef8.cloudfront.net";
pub const ASSETS_BASE: &str = "http://localhost:8091/assets";
pub const TEST_BUCKET: &str = "tubely-videos";

/// Test application: server, fakes, and owned temp directories.
pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<dyn VideoRepository>,
    pub storage: Arc<RecordingStorage>,
    pub inspector: Arc<FakeInspector>,
    pub jwt: JwtService,
    pub temp_dir: TempDir,
    pub assets_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.jwt
            .issue(user_id, TokenTtl::hours(1))
            .expect("Failed to issue token")
    }

    pub async fn create_video(&self, owner: Uuid) -> Video {
        let video = Video::new(owner, "Boots on the ground", None);
        self.repository
            .create_video(&video)
            .await
            .expect("Failed to create video");
        video
    }

    pub async fn stored_video(&self, id: Uuid) -> Video {
        self.repository
            .get_video(id)
            .await
            .expect("Failed to load video")
            .expect("Video missing")
    }

    /// Number of files left in the staging directory.
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(self.temp_dir.path())
            .expect("Failed to read temp dir")
            .count()
    }

    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.assets_dir.path().join(name)
    }
}

pub fn create_test_config(mode: UrlMode, temp_dir: &TempDir, assets_dir: &TempDir) -> Config {
    Config::new(ServiceConfig {
        base: BaseConfig {
            server_port: 8091,
            environment: "test".to_string(),
            cors_origins: vec!["*".to_string()],
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_issuer: DEFAULT_JWT_ISSUER.to_string(),
            database_url: None,
            db_max_connections: 5,
            db_timeout_seconds: 30,
        },
        storage_backend: StorageBackend::S3,
        s3_bucket: Some(TEST_BUCKET.to_string()),
        s3_region: Some("us-east-1".to_string()),
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: None,
        local_storage_base_url: None,
        video_url_mode: mode,
        s3_cf_distribution: Some(CDN_BASE.to_string()),
        presign_expiry_secs: 3600,
        max_video_size_bytes: 64 * 1024,
        max_thumbnail_size_bytes: 16 * 1024,
        upload_temp_dir: Some(temp_dir.path().to_path_buf()),
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        max_concurrent_media_tools: 2,
        media_tool_timeout_secs: 60,
        assets_root: assets_dir.path().to_path_buf(),
        assets_base_url: ASSETS_BASE.to_string(),
    })
}

/// Setup test app with static URLs and a 1920x1080 probe result.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(UrlMode::Static, FakeInspector::returning(1920, 1080)).await
}

pub async fn setup_test_app_with(mode: UrlMode, inspector: FakeInspector) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let assets_dir = tempfile::tempdir().expect("Failed to create assets directory");
    let config = create_test_config(mode, &temp_dir, &assets_dir);

    let repository: Arc<dyn VideoRepository> = Arc::new(InMemoryVideoRepository::new());
    let storage = Arc::new(RecordingStorage::new(TEST_BUCKET));
    let inspector = Arc::new(inspector);

    let urls = UrlResolver::new(
        config.video_url_mode(),
        config.public_base_url().map(String::from),
        config.presign_expiry(),
        storage.clone(),
    )
    .expect("Failed to create URL resolver");

    let videos = VideoUploadOrchestrator::new(
        repository.clone(),
        storage.clone(),
        inspector.clone(),
        Arc::new(FakeNormalizer),
        urls.clone(),
        VideoUploadConfig::from_config(&config),
    );
    let thumbnails = ThumbnailService::new(
        repository.clone(),
        config.assets_root().clone(),
        config.assets_base_url(),
        config.max_thumbnail_size_bytes(),
    );
    let jwt = JwtService::new(config.jwt_secret(), config.jwt_issuer());

    let state = Arc::new(AppState {
        config: config.clone(),
        repository: repository.clone(),
        storage: storage.clone(),
        videos,
        thumbnails,
        urls,
        jwt: jwt.clone(),
    });

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        repository,
        storage,
        inspector,
        jwt,
        temp_dir,
        assets_dir,
    }
}
