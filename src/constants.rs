// Constants module - centralized default values and wire strings
//
// Defaults used by the config layer and the literal strings that appear
// on the wire live here so the handler and the HTTP adapter agree on them.

// =============================================================================
// Environment variables
// =============================================================================

/// Bucket holding both the source images and the watermark asset
pub const ENV_BUCKET_NAME: &str = "S3_BUCKET_NAME";

/// Object key of the watermark asset inside the bucket
pub const ENV_WATERMARK_IMAGE_NAME: &str = "WATERMARK_IMAGE_NAME";

/// Serve assets from a local directory instead of S3
pub const ENV_LOCAL_ASSET_ROOT: &str = "LOCAL_ASSET_ROOT";

/// Listen address override
pub const ENV_LISTEN_ADDRESS: &str = "LISTEN_ADDRESS";

/// Listen port override
pub const ENV_LISTEN_PORT: &str = "LISTEN_PORT";

/// Log level (tracing filter directive)
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Log output format (json or pretty)
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

// =============================================================================
// Server defaults
// =============================================================================

/// Default listen address
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_LISTEN_PORT: u16 = 8080;

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Image pipeline
// =============================================================================

/// JPEG quality used for every response (the codec's standard level)
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Path parameter carrying the source image key
pub const IMAGE_KEY_PARAM: &str = "imageKey";

// =============================================================================
// Responses
// =============================================================================

pub const CONTENT_TYPE_JPEG: &str = "image/jpeg";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

pub const NOT_FOUND_BODY: &str = "Not Found";
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";
pub const METHOD_NOT_ALLOWED_BODY: &str = "Method Not Allowed";
