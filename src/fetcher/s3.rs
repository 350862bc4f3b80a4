//! S3-backed asset fetcher.

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;

use super::{check_location, AssetFetcher, FetchError};

/// Fetches objects with `GetObject`.
#[derive(Debug, Clone)]
pub struct S3AssetFetcher {
    client: S3Client,
}

impl S3AssetFetcher {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    /// Build a client from the standard AWS environment (region,
    /// credentials chain, endpoint overrides).
    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(S3Client::new(&config))
    }
}

#[async_trait]
impl AssetFetcher for S3AssetFetcher {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Bytes, FetchError> {
        check_location(bucket, key)?;

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify_get_object_error(bucket, key, e))?;

        let body = response.body.collect().await.map_err(|e| {
            FetchError::transport(bucket, key, format!("Failed to read S3 body: {e}"))
        })?;

        Ok(body.into_bytes())
    }
}

/// `NoSuchKey` is the only not-found signal. S3 answers `AccessDenied` for
/// missing keys when the caller lacks `ListBucket`; that stays a transport
/// failure.
fn classify_get_object_error(
    bucket: &str,
    key: &str,
    err: SdkError<GetObjectError>,
) -> FetchError {
    match err.as_service_error() {
        Some(service_err) if service_err.is_no_such_key() => FetchError::not_found(bucket, key),
        _ => FetchError::transport(
            bucket,
            key,
            format!("S3 fetch failed: {}", DisplayErrorContext(&err)),
        ),
    }
}
