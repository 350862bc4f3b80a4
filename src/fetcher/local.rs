//! Local-directory asset fetcher for development.
//!
//! Objects are read from `<root>/<bucket>/<key>`. Keys are confined to the
//! bucket directory: anything with `..`, a root or a prefix component is
//! reported as not found.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};

use super::{check_location, AssetFetcher, FetchError};

#[derive(Debug, Clone)]
pub struct LocalAssetFetcher {
    root: PathBuf,
}

impl LocalAssetFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, bucket: &str, key: &str) -> Option<PathBuf> {
        let relative = Path::new(bucket).join(key);
        let confined = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        confined.then(|| self.root.join(relative))
    }
}

#[async_trait]
impl AssetFetcher for LocalAssetFetcher {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Bytes, FetchError> {
        check_location(bucket, key)?;

        let path = self
            .resolve(bucket, key)
            .ok_or_else(|| FetchError::not_found(bucket, key))?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::not_found(bucket, key))
            }
            Err(e) => Err(FetchError::transport(
                bucket,
                key,
                format!("Failed to read {}: {e}", path.display()),
            )),
        }
    }
}
