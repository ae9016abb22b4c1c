//! Storage key selection.
//!
//! Every object id is 32 bytes from the thread-local CSPRNG, encoded as
//! unpadded base64url, so keys never need a uniqueness check.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use tubely_core::constants::OBJECT_ID_BYTES;
use tubely_core::AspectRatio;

use crate::traits::{StorageError, StorageResult};

/// Generate a random 256-bit identifier encoded as unpadded base64url.
pub fn random_object_id() -> String {
    let mut bytes = [0u8; OBJECT_ID_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Storage key for an uploaded video: `<aspect-prefix>/<random-id><ext>`.
pub fn video_object_key(aspect: AspectRatio, extension: &str) -> String {
    format!("{}/{}{}", aspect.prefix(), random_object_id(), extension)
}

/// File name for a thumbnail asset: `<random-id><ext>`.
pub fn asset_file_name(extension: &str) -> String {
    format!("{}{}", random_object_id(), extension)
}

/// Reject keys that could escape a storage root.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    Ok(())
}
