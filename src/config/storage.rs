//! Storage configuration: where source images and the watermark live.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding source images and the watermark. No default.
    #[serde(default)]
    pub bucket_name: String,

    /// Key of the watermark asset inside `bucket_name`. No default.
    #[serde(default)]
    pub watermark_image_name: String,

    /// Serve assets from `<local_root>/<bucket_name>/<key>` instead of S3
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_root: Option<PathBuf>,
}

impl StorageConfig {
    /// Names of required settings that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.bucket_name.is_empty() {
            missing.push("bucket_name");
        }
        if self.watermark_image_name.is_empty() {
            missing.push("watermark_image_name");
        }
        missing
    }
}
