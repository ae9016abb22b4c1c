use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, PutMultipartOptions, WriteMultipart,
};
use std::pin::Pin;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Size of each read from the local file while streaming an upload.
const READ_CHUNK_BYTES: usize = 1024 * 1024;

/// Maximum multipart parts in flight per upload.
const MAX_PARTS_IN_FLIGHT: usize = 4;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    builder: AmazonS3Builder,
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - Default S3 bucket for uploads
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        // Credentials come from the standard AWS environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_virtual_hosted_style_request(endpoint_url.is_none());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        Self::from_builder(builder, bucket)
    }

    /// Build from a preconfigured builder. The bucket name is applied here.
    pub fn from_builder(builder: AmazonS3Builder, bucket: String) -> StorageResult<Self> {
        let store = builder
            .clone()
            .with_bucket_name(bucket.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            builder,
            store,
            bucket,
        })
    }

    /// Object store handle for `bucket`, reusing the default one when possible.
    fn store_for(&self, bucket: &str) -> StorageResult<AmazonS3> {
        if bucket == self.bucket {
            return Ok(self.store.clone());
        }

        self.builder
            .clone()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }
}

/// Split object store failures into "try again later" and "will not work".
fn classify_error(err: ObjectStoreError) -> StorageError {
    match err {
        ObjectStoreError::NotFound { .. } => StorageError::NotFound(err.to_string()),
        ObjectStoreError::PermissionDenied { .. }
        | ObjectStoreError::Unauthenticated { .. }
        | ObjectStoreError::AlreadyExists { .. }
        | ObjectStoreError::Precondition { .. }
        | ObjectStoreError::InvalidPath { .. } => StorageError::Rejected(err.to_string()),
        other => StorageError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        content_type: &str,
    ) -> StorageResult<u64> {
        validate_key(key)?;
        let store = self.store_for(bucket)?;
        let location = Path::from(key);
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let opts = PutMultipartOptions {
            attributes,
            ..Default::default()
        };

        let upload = store
            .put_multipart_opts(&location, opts)
            .await
            .map_err(classify_error)?;
        let mut writer = WriteMultipart::new(upload);

        let mut buf = vec![0u8; READ_CHUNK_BYTES];
        let mut total: u64 = 0;
        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    if let Err(abort_err) = writer.abort().await {
                        tracing::warn!(error = %abort_err, bucket = %bucket, key = %key, "Failed to abort S3 multipart upload");
                    }
                    return Err(StorageError::Io(e));
                }
            };

            if let Err(e) = writer.wait_for_capacity(MAX_PARTS_IN_FLIGHT).await {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    size_bytes = total,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 part upload failed"
                );
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(error = %abort_err, bucket = %bucket, key = %key, "Failed to abort S3 multipart upload");
                }
                return Err(classify_error(e));
            }

            writer.write(&buf[..n]);
            total += n as u64;
        }

        writer.finish().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                key = %key,
                size_bytes = total,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            classify_error(e)
        })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = total,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(total)
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        validate_key(key)?;
        let store = self.store_for(bucket)?;
        let location = Path::from(key);

        let url = store
            .signed_url(Method::GET, &location, expires_in)
            .await
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;

        Ok(url.to_string())
    }

    fn default_bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_storage(bucket: &str) -> S3Storage {
        let builder = AmazonS3Builder::new()
            .with_region("us-east-1")
            .with_access_key_id("AKIDEXAMPLE")
            .with_secret_access_key("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
            .with_virtual_hosted_style_request(true);
        S3Storage::from_builder(builder, bucket.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_presigned_url_targets_bucket_and_key() {
        let storage = offline_storage("defaultbucket");
        let url = storage
            .presigned_get_url("mybucket", "videos/abc.mp4", Duration::from_secs(3600))
            .await
            .unwrap();

        let (base, query) = url.split_once('?').unwrap();
        assert!(base.starts_with("https://mybucket."), "{url}");
        assert!(base.ends_with("/videos/abc.mp4"), "{url}");
        assert!(query.contains("X-Amz-Expires=3600"), "{url}");
        assert!(query.contains("X-Amz-Signature="), "{url}");
    }

    #[tokio::test]
    async fn test_presigned_url_rejects_bad_key() {
        let storage = offline_storage("mybucket");
        let err = storage
            .presigned_get_url("mybucket", "../secret", Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[test]
    fn test_classify_error() {
        let denied = ObjectStoreError::PermissionDenied {
            path: "k".to_string(),
            source: "denied".into(),
        };
        assert!(matches!(classify_error(denied), StorageError::Rejected(_)));

        let generic = ObjectStoreError::Generic {
            store: "S3",
            source: "connection reset".into(),
        };
        assert!(matches!(classify_error(generic), StorageError::Unavailable(_)));
    }
}
