//! HTTP-level constants

/// Prefix for every JSON API route.
pub const API_PREFIX: &str = "/api";

/// Path the thumbnail assets directory is served under.
pub const ASSETS_ROUTE: &str = "/assets";

/// Path the local storage backend is served under.
pub const MEDIA_ROUTE: &str = "/media";

/// Allowance on top of the file size limit for multipart framing and other fields.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;
