//! Tubely Storage Library
//!
//! Object storage abstraction for uploaded videos, with S3 and local
//! filesystem backends, storage key selection, and video URL resolution.
//!
//! # Storage key format
//!
//! Video keys are `<aspect-prefix>/<random-id><ext>` where the prefix is one of
//! `landscape`, `portrait` or `other` and the id is 32 random bytes encoded as
//! unpadded base64url. Keys must not contain `..` or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod reference;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;
pub mod url;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use reference::StorageObjectRef;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
pub use url::UrlResolver;
