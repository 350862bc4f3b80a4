//! Asset fetcher: raw bytes for a `(bucket, key)` pair.
//!
//! The rest of the service only sees the [`AssetFetcher`] trait. Three
//! backends are provided:
//!
//! - [`S3AssetFetcher`] - production backend over `aws-sdk-s3`
//! - [`LocalAssetFetcher`] - `<root>/<bucket>/<key>` on the local disk
//! - [`MemoryAssetFetcher`] - in-process map with fetch counters
//!
//! Fetchers never retry. A missing object is `NotFound`; every other
//! failure is `TransportFailure`.

use async_trait::async_trait;
use bytes::Bytes;

pub mod local;
pub mod memory;
pub mod s3;

pub use local::LocalAssetFetcher;
pub use memory::MemoryAssetFetcher;
pub use s3::S3AssetFetcher;

/// Errors returned by asset fetchers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The key does not exist in the store
    #[error("Asset not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Network, permission, timeout or any other retrieval failure
    #[error("Failed to fetch {bucket}/{key}: {message}")]
    TransportFailure {
        bucket: String,
        key: String,
        message: String,
    },
}

impl FetchError {
    pub fn not_found(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        FetchError::NotFound {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    pub fn transport(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        FetchError::TransportFailure {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }

    /// Short label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::NotFound { .. } => "not_found",
            FetchError::TransportFailure { .. } => "transport_failure",
        }
    }
}

/// Byte-fetch-by-key over an object store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch the complete content of `key` in `bucket`.
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Bytes, FetchError>;
}

/// Reject locations that no backend can serve.
///
/// An unset bucket is a transport failure (the store cannot be addressed);
/// an empty key simply names nothing.
pub(crate) fn check_location(bucket: &str, key: &str) -> Result<(), FetchError> {
    if bucket.is_empty() {
        return Err(FetchError::transport(
            bucket,
            key,
            "bucket name is not configured",
        ));
    }
    if key.is_empty() {
        return Err(FetchError::not_found(bucket, key));
    }
    Ok(())
}
