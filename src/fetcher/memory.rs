//! In-memory asset fetcher.
//!
//! Holds objects in a map and counts every fetch per key, which makes it
//! the backend of choice for tests and benchmarks. Transport failures can
//! be injected per key and an artificial latency widens race windows.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::time::Duration;

use super::{check_location, AssetFetcher, FetchError};

type ObjectId = (String, String);

#[derive(Debug, Default)]
pub struct MemoryAssetFetcher {
    objects: RwLock<HashMap<ObjectId, Bytes>>,
    failures: RwLock<HashMap<ObjectId, String>>,
    fetch_counts: Mutex<HashMap<ObjectId, usize>>,
    latency: Option<Duration>,
}

impl MemoryAssetFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every fetch by `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Store an object, replacing any previous content.
    pub fn insert(&self, bucket: &str, key: &str, data: impl Into<Bytes>) {
        self.objects
            .write()
            .insert((bucket.to_string(), key.to_string()), data.into());
    }

    /// Make fetches of this object fail with `TransportFailure`.
    pub fn fail_with(&self, bucket: &str, key: &str, message: impl Into<String>) {
        self.failures
            .write()
            .insert((bucket.to_string(), key.to_string()), message.into());
    }

    /// Stop injecting failures for this object.
    pub fn clear_failure(&self, bucket: &str, key: &str) {
        self.failures
            .write()
            .remove(&(bucket.to_string(), key.to_string()));
    }

    /// Number of fetch calls for this object, successful or not.
    pub fn fetch_count(&self, bucket: &str, key: &str) -> usize {
        self.fetch_counts
            .lock()
            .get(&(bucket.to_string(), key.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetch_counts.lock().values().sum()
    }
}

#[async_trait]
impl AssetFetcher for MemoryAssetFetcher {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Bytes, FetchError> {
        let id = (bucket.to_string(), key.to_string());
        *self.fetch_counts.lock().entry(id.clone()).or_insert(0) += 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        check_location(bucket, key)?;

        if let Some(message) = self.failures.read().get(&id) {
            return Err(FetchError::transport(bucket, key, message.clone()));
        }

        self.objects
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| FetchError::not_found(bucket, key))
    }
}
