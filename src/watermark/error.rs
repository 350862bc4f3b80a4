//! Watermark error types.

use crate::codec::CodecError;
use crate::fetcher::FetchError;

/// Errors that can occur while loading the watermark asset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatermarkError {
    /// Failed to fetch the watermark asset from the store
    #[error("Failed to fetch watermark '{key}': {source}")]
    Fetch { key: String, source: FetchError },

    /// Failed to decode the watermark asset
    #[error("Failed to decode watermark '{key}': {source}")]
    Decode { key: String, source: CodecError },
}
