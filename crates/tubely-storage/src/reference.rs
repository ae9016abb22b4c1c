use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::traits::{StorageError, StorageResult};

/// Persisted identity of an uploaded object, stored as `"<bucket>,<key>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageObjectRef {
    pub bucket: String,
    pub key: String,
}

impl StorageObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse a stored `"<bucket>,<key>"` value.
    ///
    /// Exactly two non-empty comma-separated parts are required.
    pub fn parse(stored: &str) -> StorageResult<Self> {
        if stored.is_empty() {
            return Err(StorageError::InvalidStoredReference(
                "stored video reference is empty".to_string(),
            ));
        }

        let parts: Vec<&str> = stored.split(',').collect();
        match parts.as_slice() {
            [bucket, key] if !bucket.is_empty() && !key.is_empty() => {
                Ok(Self::new(*bucket, *key))
            }
            _ => Err(StorageError::InvalidStoredReference(format!(
                "expected '<bucket>,<key>', got {} part(s)",
                parts.len()
            ))),
        }
    }

    /// Serialized form persisted in the video record.
    pub fn to_stored(&self) -> String {
        format!("{},{}", self.bucket, self.key)
    }
}

impl Display for StorageObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{},{}", self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_reference() {
        let r = StorageObjectRef::parse("mybucket,videos/abc.mp4").unwrap();
        assert_eq!(r.bucket, "mybucket");
        assert_eq!(r.key, "videos/abc.mp4");
        assert_eq!(r.to_stored(), "mybucket,videos/abc.mp4");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for stored in [
            "",
            "no-comma",
            "a,b,c",
            ",key.mp4",
            "bucket,",
            "https://cdn.example.com/landscape/x.mp4",
        ] {
            let err = StorageObjectRef::parse(stored).unwrap_err();
            assert!(
                matches!(err, StorageError::InvalidStoredReference(_)),
                "{stored:?}"
            );
        }
    }
}
