//! Image codec: format-sniffing decode and fixed-format encode.
//!
//! Decoding accepts any of the supported raster formats and dispatches on
//! the header signature. Encoding always produces baseline JPEG so every
//! successful response carries the same media type.
//!
//! # Example
//!
//! ```ignore
//! use inkstamp::codec::{decode, encode};
//!
//! let (buffer, format) = decode(&bytes)?;
//! let jpeg = encode(&buffer)?;
//! assert_eq!(jpeg.content_type, "image/jpeg");
//! ```

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod pixel_buffer;

pub use decoder::decode;
pub use encoder::{encode, EncodedImage};
pub use error::CodecError;
pub use format::FormatTag;
pub use pixel_buffer::PixelBuffer;
