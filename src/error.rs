// Error types module

use std::fmt;

use crate::codec::CodecError;
use crate::constants::{INTERNAL_ERROR_BODY, NOT_FOUND_BODY};
use crate::fetcher::FetchError;
use crate::watermark::WatermarkError;

/// Externally visible failure of a watermark request
///
/// Every internal failure collapses into one of these two kinds. The
/// conversions below are the only place that classification happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Missing image key, or the source image could not be fetched
    NotFound(String),

    /// Watermark unavailable, decode or encode failure
    Internal(String),
}

impl ServiceError {
    /// HTTP status code reported to the caller
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 404,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Response body reported to the caller. Never includes internal detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => NOT_FOUND_BODY,
            ServiceError::Internal(_) => INTERNAL_ERROR_BODY,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

// Any failure to fetch the requested image is reported as 404, including
// transport failures.
impl From<FetchError> for ServiceError {
    fn from(err: FetchError) -> Self {
        ServiceError::NotFound(err.to_string())
    }
}

impl From<CodecError> for ServiceError {
    fn from(err: CodecError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<WatermarkError> for ServiceError {
    fn from(err: WatermarkError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}
