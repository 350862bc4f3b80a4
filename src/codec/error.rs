//! Codec error types

use super::FormatTag;

/// Errors raised while decoding or encoding images
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// No supported decoder recognizes the header
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    /// Header recognized, payload could not be parsed
    #[error("Corrupted {format} data: {message}")]
    CorruptData { format: FormatTag, message: String },

    /// Encoder rejected the buffer
    #[error("Failed to encode to {format}: {message}")]
    EncodeFailure {
        format: &'static str,
        message: String,
    },
}

impl CodecError {
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        CodecError::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn corrupt_data(format: FormatTag, message: impl Into<String>) -> Self {
        CodecError::CorruptData {
            format,
            message: message.into(),
        }
    }

    pub fn encode_failure(format: &'static str, message: impl Into<String>) -> Self {
        CodecError::EncodeFailure {
            format,
            message: message.into(),
        }
    }
}
