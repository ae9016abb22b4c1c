//! Configuration module
//!
//! Configuration is read once from the environment (and an optional `.env`
//! file), validated, and then passed by value to every component that needs
//! it. Nothing reads the environment after startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_JWT_ISSUER, DEFAULT_PRESIGN_EXPIRY};
use crate::storage_types::{StorageBackend, UrlMode};

// Common constants
const SERVER_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_VIDEO_SIZE_MB: u64 = 1024;
const MAX_THUMBNAIL_SIZE_MB: u64 = 10;
const MAX_CONCURRENT_MEDIA_TOOLS: usize = 2;
const MEDIA_TOOL_TIMEOUT_SECS: u64 = 600;
const MIN_JWT_SECRET_LEN: usize = 32;

/// Server, auth and environment settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
}

/// Full service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Video URL handling
    pub video_url_mode: UrlMode,
    pub s3_cf_distribution: Option<String>,
    pub presign_expiry_secs: u64,
    // Upload limits
    pub max_video_size_bytes: u64,
    pub max_thumbnail_size_bytes: u64,
    pub upload_temp_dir: Option<PathBuf>,
    // Media tools
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub max_concurrent_media_tools: usize,
    pub media_tool_timeout_secs: u64,
    // Thumbnails
    pub assets_root: PathBuf,
    pub assets_base_url: String,
}

/// Application configuration handle
#[derive(Clone, Debug)]
pub struct Config(Box<ServiceConfig>);

impl Config {
    pub fn new(config: ServiceConfig) -> Self {
        Config(Box::new(config))
    }

    pub fn as_service(&self) -> &ServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.0.validate()
    }

    pub fn is_production(&self) -> bool {
        let env = self.0.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.0.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.0.base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.0.base.cors_origins
    }

    pub fn jwt_secret(&self) -> &str {
        &self.0.base.jwt_secret
    }

    pub fn jwt_issuer(&self) -> &str {
        &self.0.base.jwt_issuer
    }

    pub fn database_url(&self) -> Option<&str> {
        self.0.base.database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.0.base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.0.base.db_timeout_seconds
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.0.storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.0.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.0.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.0.s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.0.aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.0.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.0.local_storage_base_url.as_deref()
    }

    pub fn video_url_mode(&self) -> UrlMode {
        self.0.video_url_mode
    }

    pub fn s3_cf_distribution(&self) -> Option<&str> {
        self.0.s3_cf_distribution.as_deref()
    }

    /// Base URL for static-mode video URLs.
    ///
    /// The CDN distribution when one is configured, otherwise the local
    /// backend's public base URL.
    pub fn public_base_url(&self) -> Option<&str> {
        self.s3_cf_distribution().or(match self.storage_backend() {
            StorageBackend::Local => self.local_storage_base_url(),
            StorageBackend::S3 => None,
        })
    }

    pub fn presign_expiry(&self) -> Duration {
        Duration::from_secs(self.0.presign_expiry_secs)
    }

    pub fn max_video_size_bytes(&self) -> u64 {
        self.0.max_video_size_bytes
    }

    pub fn max_thumbnail_size_bytes(&self) -> u64 {
        self.0.max_thumbnail_size_bytes
    }

    /// Directory for staged uploads; the system temp dir when unset.
    pub fn upload_temp_dir(&self) -> PathBuf {
        self.0
            .upload_temp_dir
            .clone()
            .unwrap_or_else(env::temp_dir)
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.0.ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.0.ffprobe_path
    }

    pub fn max_concurrent_media_tools(&self) -> usize {
        self.0.max_concurrent_media_tools
    }

    pub fn media_tool_timeout(&self) -> Duration {
        Duration::from_secs(self.0.media_tool_timeout_secs)
    }

    pub fn assets_root(&self) -> &PathBuf {
        &self.0.assets_root
    }

    pub fn assets_base_url(&self) -> &str {
        &self.0.assets_base_url
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port,
            environment,
            cors_origins,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_JWT_ISSUER.to_string()),
            database_url: non_empty_var("DATABASE_URL"),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
        };

        let storage_backend = match non_empty_var("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let video_url_mode = match non_empty_var("VIDEO_URL_MODE") {
            Some(value) => value.parse()?,
            None => UrlMode::Static,
        };

        let max_video_size_mb = env::var("MAX_VIDEO_SIZE_MB")
            .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_VIDEO_SIZE_MB);

        let max_thumbnail_size_mb = env::var("MAX_THUMBNAIL_SIZE_MB")
            .unwrap_or_else(|_| MAX_THUMBNAIL_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_THUMBNAIL_SIZE_MB);

        let assets_base_url = env::var("ASSETS_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}/assets", server_port));

        Ok(ServiceConfig {
            base,
            storage_backend,
            s3_bucket: non_empty_var("S3_BUCKET"),
            s3_region: non_empty_var("S3_REGION"),
            s3_endpoint: non_empty_var("S3_ENDPOINT"),
            aws_region: non_empty_var("AWS_REGION"),
            local_storage_path: non_empty_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: non_empty_var("LOCAL_STORAGE_BASE_URL"),
            video_url_mode,
            s3_cf_distribution: non_empty_var("S3_CF_DISTRIBUTION"),
            presign_expiry_secs: env::var("PRESIGN_EXPIRY_SECS")
                .unwrap_or_else(|_| DEFAULT_PRESIGN_EXPIRY.as_secs().to_string())
                .parse()
                .unwrap_or(DEFAULT_PRESIGN_EXPIRY.as_secs()),
            max_video_size_bytes: max_video_size_mb * 1024 * 1024,
            max_thumbnail_size_bytes: max_thumbnail_size_mb * 1024 * 1024,
            upload_temp_dir: non_empty_var("UPLOAD_TEMP_DIR").map(PathBuf::from),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            max_concurrent_media_tools: env::var("MAX_CONCURRENT_MEDIA_TOOLS")
                .unwrap_or_else(|_| MAX_CONCURRENT_MEDIA_TOOLS.to_string())
                .parse()
                .unwrap_or(MAX_CONCURRENT_MEDIA_TOOLS),
            media_tool_timeout_secs: env::var("MEDIA_TOOL_TIMEOUT_SECS")
                .unwrap_or_else(|_| MEDIA_TOOL_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(MEDIA_TOOL_TIMEOUT_SECS),
            assets_root: PathBuf::from(
                env::var("ASSETS_ROOT").unwrap_or_else(|_| "./assets".to_string()),
            ),
            assets_base_url,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if let Some(url) = &self.base.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
                if self.video_url_mode == UrlMode::Static && self.s3_cf_distribution.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_CF_DISTRIBUTION must be set when VIDEO_URL_MODE=static"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        if self.max_concurrent_media_tools == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONCURRENT_MEDIA_TOOLS must be greater than 0"
            ));
        }

        if self.media_tool_timeout_secs == 0 {
            return Err(anyhow::anyhow!("MEDIA_TOOL_TIMEOUT_SECS must be greater than 0"));
        }

        if self.max_video_size_bytes == 0 || self.max_thumbnail_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than 0"));
        }

        if self.presign_expiry_secs == 0 {
            return Err(anyhow::anyhow!("PRESIGN_EXPIRY_SECS must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ServiceConfig {
        ServiceConfig {
            base: BaseConfig {
                server_port: 8091,
                environment: "test".to_string(),
                cors_origins: vec!["*".to_string()],
                jwt_secret: "a".repeat(32),
                jwt_issuer: DEFAULT_JWT_ISSUER.to_string(),
                database_url: None,
                db_max_connections: MAX_CONNECTIONS,
                db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            },
            storage_backend: StorageBackend::S3,
            s3_bucket: Some("tubely-videos".to_string()),
            s3_region: Some("us-east-1".to_string()),
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: None,
            local_storage_base_url: None,
            video_url_mode: UrlMode::Static,
            s3_cf_distribution: Some("https://d111111abcdef8.cloudfront.net".to_string()),
            presign_expiry_secs: 3600,
            max_video_size_bytes: 1 << 30,
            max_thumbnail_size_bytes: 10 << 20,
            upload_temp_dir: None,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            max_concurrent_media_tools: 2,
            media_tool_timeout_secs: 600,
            assets_root: PathBuf::from("./assets"),
            assets_base_url: "http://localhost:8091/assets".to_string(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut config = valid_config();
        config.base.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_static_mode_on_s3_requires_distribution() {
        let mut config = valid_config();
        config.s3_cf_distribution = None;
        assert!(config.validate().is_err());

        config.video_url_mode = UrlMode::Signed;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_backend_requires_path_and_url() {
        let mut config = valid_config();
        config.storage_backend = StorageBackend::Local;
        assert!(config.validate().is_err());

        config.local_storage_path = Some("/tmp/tubely".to_string());
        config.local_storage_base_url = Some("http://localhost:8091/media".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = valid_config();
        config.max_concurrent_media_tools = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_public_base_url_prefers_distribution() {
        let mut config = valid_config();
        config.storage_backend = StorageBackend::Local;
        config.local_storage_base_url = Some("http://localhost:8091/media".to_string());
        let cfg = Config::new(config.clone());
        assert_eq!(
            cfg.public_base_url(),
            Some("https://d111111abcdef8.cloudfront.net")
        );

        config.s3_cf_distribution = None;
        let cfg = Config::new(config);
        assert_eq!(cfg.public_base_url(), Some("http://localhost:8091/media"));
    }

    #[test]
    fn test_upload_temp_dir_defaults_to_system_temp() {
        let cfg = Config::new(valid_config());
        assert_eq!(cfg.upload_temp_dir(), env::temp_dir());
    }
}
