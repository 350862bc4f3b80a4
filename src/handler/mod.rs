//! Request handler: one request in, one response out.
//!
//! Steps, terminal on the first failure:
//!
//! 1. Extract `imageKey` (missing or empty → 404)
//! 2. Resolve the cached watermark (failure → 500)
//! 3. Fetch the source image (any failure → 404)
//! 4. Decode, composite and encode on the blocking pool (failure → 500)
//! 5. Return the JPEG as a base64 body
//!
//! Nothing is retried. The only state shared between requests is the
//! watermark cache.

use bytes::Bytes;
use std::sync::Arc;

use crate::codec::{self, EncodedImage, PixelBuffer};
use crate::config::StorageConfig;
use crate::error::ServiceError;
use crate::fetcher::{AssetFetcher, FetchError};
use crate::watermark::{composite, WatermarkCache};

pub mod event;

pub use event::{ApiRequest, ApiResponse};

pub struct WatermarkHandler {
    bucket: String,
    fetcher: Arc<dyn AssetFetcher>,
    watermark: WatermarkCache,
}

impl WatermarkHandler {
    /// Build a handler that reads source images and the watermark from the
    /// configured bucket.
    pub fn new(fetcher: Arc<dyn AssetFetcher>, storage: &StorageConfig) -> Self {
        let watermark = WatermarkCache::new(
            Arc::clone(&fetcher),
            storage.bucket_name.clone(),
            storage.watermark_image_name.clone(),
        );
        Self {
            bucket: storage.bucket_name.clone(),
            fetcher,
            watermark,
        }
    }

    pub fn watermark_cache(&self) -> &WatermarkCache {
        &self.watermark
    }

    /// Handle one request. Never fails: every outcome is a response.
    pub async fn handle(&self, request: &ApiRequest) -> ApiResponse {
        match self.process(request).await {
            Ok(encoded) => {
                tracing::info!(
                    status = 200,
                    bytes = encoded.data.len(),
                    "watermarked image served"
                );
                ApiResponse::image(&encoded)
            }
            Err(err) => {
                tracing::info!(status = err.status_code(), error = %err, "request failed");
                ApiResponse::from_error(&err)
            }
        }
    }

    async fn process(&self, request: &ApiRequest) -> Result<EncodedImage, ServiceError> {
        let key = request
            .image_key()
            .ok_or_else(|| ServiceError::NotFound("missing imageKey path parameter".into()))?;

        let watermark = self.watermark.get_watermark().await.map_err(|err| {
            tracing::error!(error = %err, "watermark unavailable");
            ServiceError::from(err)
        })?;

        let data = self
            .fetcher
            .fetch(&self.bucket, key)
            .await
            .map_err(|err| log_fetch_failure(key, err))?;

        tokio::task::spawn_blocking(move || render(data, &watermark))
            .await
            .map_err(|e| ServiceError::Internal(format!("render task failed: {e}")))?
    }
}

impl std::fmt::Debug for WatermarkHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkHandler")
            .field("bucket", &self.bucket)
            .field("watermark", &self.watermark)
            .finish()
    }
}

/// Transport failures are reported to the caller as 404 like missing keys,
/// but logged louder so they remain distinguishable.
fn log_fetch_failure(key: &str, err: FetchError) -> ServiceError {
    if err.is_not_found() {
        tracing::debug!(key, kind = err.kind(), "source image not found");
    } else {
        tracing::warn!(key, kind = err.kind(), error = %err, "source image fetch failed");
    }
    ServiceError::from(err)
}

/// CPU-bound part of the pipeline: decode → composite → encode.
fn render(data: Bytes, watermark: &PixelBuffer) -> Result<EncodedImage, ServiceError> {
    let (base, format) = codec::decode(&data).map_err(|err| {
        tracing::warn!(error = %err, "source image decode failed");
        ServiceError::from(err)
    })?;

    tracing::debug!(
        format = %format,
        width = base.width(),
        height = base.height(),
        "compositing watermark"
    );

    let composited = composite(base, watermark);
    Ok(codec::encode(&composited)?)
}
