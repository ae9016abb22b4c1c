//! Video URL resolution.
//!
//! In static mode the persisted value is the final URL. In signed mode the
//! persisted value is a `"<bucket>,<key>"` reference and every read mints a
//! fresh signed URL from it.

use std::sync::Arc;
use std::time::Duration;
use tubely_core::UrlMode;

use crate::reference::StorageObjectRef;
use crate::traits::{Storage, StorageError, StorageResult};

#[derive(Clone)]
pub struct UrlResolver {
    mode: UrlMode,
    public_base_url: Option<String>,
    expiry: Duration,
    storage: Arc<dyn Storage>,
}

impl UrlResolver {
    /// `public_base_url` is required in static mode and ignored in signed mode.
    pub fn new(
        mode: UrlMode,
        public_base_url: Option<String>,
        expiry: Duration,
        storage: Arc<dyn Storage>,
    ) -> StorageResult<Self> {
        if mode == UrlMode::Static && public_base_url.is_none() {
            return Err(StorageError::ConfigError(
                "static URL mode requires a public base URL".to_string(),
            ));
        }

        Ok(Self {
            mode,
            public_base_url,
            expiry,
            storage,
        })
    }

    pub fn mode(&self) -> UrlMode {
        self.mode
    }

    /// Value to persist in the video record for a freshly uploaded object.
    pub fn reference_for(&self, bucket: &str, key: &str) -> StorageResult<String> {
        match self.mode {
            UrlMode::Static => {
                let base = self.public_base_url.as_deref().ok_or_else(|| {
                    StorageError::ConfigError("public base URL not configured".to_string())
                })?;
                Ok(format!("{}/{}", base.trim_end_matches('/'), key))
            }
            UrlMode::Signed => Ok(StorageObjectRef::new(bucket, key).to_stored()),
        }
    }

    /// Turn a persisted value into a URL a client can fetch.
    pub async fn resolve(&self, stored: &str) -> StorageResult<String> {
        match self.mode {
            UrlMode::Static => {
                if stored.is_empty() {
                    return Err(StorageError::InvalidStoredReference(
                        "stored video URL is empty".to_string(),
                    ));
                }
                Ok(stored.to_string())
            }
            UrlMode::Signed => {
                let object = StorageObjectRef::parse(stored)?;
                let url = self
                    .storage
                    .presigned_get_url(&object.bucket, &object.key, self.expiry)
                    .await?;
                tracing::debug!(
                    bucket = %object.bucket,
                    key = %object.key,
                    expires_in_secs = self.expiry.as_secs(),
                    "Signed video URL generated"
                );
                Ok(url)
            }
        }
    }
}
