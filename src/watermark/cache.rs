//! Process-wide watermark cache.
//!
//! The watermark is fetched and decoded once, on first use, and then shared
//! read-only by every request for the life of the process. There is no
//! eviction or refresh; restarting the process is the only way to pick up
//! a new watermark.
//!
//! Population goes through a `tokio::sync::OnceCell`:
//!
//! - concurrent first callers wait on the one in-flight load instead of
//!   starting their own
//! - a failed load leaves the cell empty, so the next caller retries
//! - once set, reads are a plain atomic load with no locking

use std::sync::Arc;
use tokio::sync::OnceCell;

use super::WatermarkError;
use crate::codec::{self, PixelBuffer};
use crate::fetcher::AssetFetcher;

pub struct WatermarkCache {
    fetcher: Arc<dyn AssetFetcher>,
    bucket: String,
    key: String,
    slot: OnceCell<Arc<PixelBuffer>>,
}

impl WatermarkCache {
    /// Create an empty cache for the watermark at `bucket`/`key`.
    pub fn new(
        fetcher: Arc<dyn AssetFetcher>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            bucket: bucket.into(),
            key: key.into(),
            slot: OnceCell::new(),
        }
    }

    /// Return the decoded watermark, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns `WatermarkError` if the fetch or decode fails. Failures are
    /// not cached.
    pub async fn get_watermark(&self) -> Result<Arc<PixelBuffer>, WatermarkError> {
        if let Some(watermark) = self.slot.get() {
            return Ok(Arc::clone(watermark));
        }

        let watermark = self.slot.get_or_try_init(|| self.load()).await?;
        Ok(Arc::clone(watermark))
    }

    /// Whether the watermark has been loaded.
    pub fn is_populated(&self) -> bool {
        self.slot.initialized()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    async fn load(&self) -> Result<Arc<PixelBuffer>, WatermarkError> {
        tracing::debug!(bucket = %self.bucket, key = %self.key, "loading watermark");

        let data = self
            .fetcher
            .fetch(&self.bucket, &self.key)
            .await
            .map_err(|source| WatermarkError::Fetch {
                key: self.key.clone(),
                source,
            })?;

        let (watermark, format) =
            codec::decode(&data).map_err(|source| WatermarkError::Decode {
                key: self.key.clone(),
                source,
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %self.key,
            format = %format,
            width = watermark.width(),
            height = watermark.height(),
            "watermark cached"
        );

        Ok(Arc::new(watermark))
    }
}

impl std::fmt::Debug for WatermarkCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkCache")
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .field("populated", &self.is_populated())
            .finish()
    }
}
