//! Shared constants

use std::time::Duration;

/// The only container format accepted by the video upload endpoint.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// File extension used for stored videos.
pub const VIDEO_EXTENSION: &str = ".mp4";

/// Multipart field carrying the video binary.
pub const VIDEO_FORM_FIELD: &str = "video";

/// Multipart field carrying the thumbnail image.
pub const THUMBNAIL_FORM_FIELD: &str = "thumbnail";

/// Prefix for staged upload files in the temp directory.
pub const UPLOAD_TEMP_PREFIX: &str = "tubely-upload";

/// Suffix appended to a staged file path to name its fast-start copy.
pub const NORMALIZED_SUFFIX: &str = ".processing";

/// Number of random bytes in an object identifier (256 bits).
pub const OBJECT_ID_BYTES: usize = 32;

/// Default validity window for signed video URLs.
pub const DEFAULT_PRESIGN_EXPIRY: Duration = Duration::from_secs(60 * 60);

/// Issuer required on access tokens.
pub const DEFAULT_JWT_ISSUER: &str = "tubely-access";

/// Thumbnail content types and the extension each is stored under.
pub const THUMBNAIL_CONTENT_TYPES: &[(&str, &str)] = &[("image/jpeg", ".jpg"), ("image/png", ".png")];
