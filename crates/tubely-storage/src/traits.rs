//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncRead;
use tubely_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Transient connectivity or service failure; the write may succeed on retry.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The store refused the operation (authorization, quota, invalid request).
    #[error("Storage rejected request: {0}")]
    Rejected(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Invalid stored reference: {0}")]
    InvalidStoredReference(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable(msg) => AppError::StoreUnavailable(msg),
            StorageError::Rejected(msg) => AppError::UploadRejected(msg),
            StorageError::NotFound(msg) => AppError::UploadRejected(format!("not found: {}", msg)),
            StorageError::InvalidKey(msg) => AppError::InvariantViolation(msg),
            StorageError::InvalidStoredReference(msg) => AppError::InvariantViolation(msg),
            StorageError::SigningFailed(msg) => AppError::SigningFailed(msg),
            StorageError::Io(e) => AppError::LocalIo(e),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// upload pipeline never couples to a specific backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload everything `reader` yields to `bucket`/`key`, overwriting any
    /// existing object. Returns the number of bytes written.
    ///
    /// The write is all-or-nothing from the caller's point of view: on error
    /// no object is left at `key` by this call.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        content_type: &str,
    ) -> StorageResult<u64>;

    /// Generate a time-limited GET URL for `bucket`/`key`.
    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Bucket uploads go to.
    fn default_bucket(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
