//! Format-agnostic decoding

use super::format::describe_header;
use super::{CodecError, FormatTag, PixelBuffer};

/// Decode bytes of any supported format into an RGBA pixel buffer.
///
/// The format is chosen from the header signature, never from a file name.
/// Animated GIFs yield their first frame.
///
/// # Errors
///
/// - `UnsupportedFormat` if no supported decoder recognizes the header
/// - `CorruptData` if the header matched but the payload did not parse, or
///   the decoder produced an empty image
pub fn decode(data: &[u8]) -> Result<(PixelBuffer, FormatTag), CodecError> {
    let format = FormatTag::sniff(data)
        .ok_or_else(|| CodecError::unsupported_format(describe_header(data)))?;

    let image = image::load_from_memory_with_format(data, format.image_format())
        .map_err(|e| CodecError::corrupt_data(format, e.to_string()))?;

    let buffer = PixelBuffer::from_rgba(image.into_rgba8())
        .ok_or_else(|| CodecError::corrupt_data(format, "image has zero width or height"))?;

    tracing::trace!(
        format = %format,
        width = buffer.width(),
        height = buffer.height(),
        "decoded image"
    );

    Ok((buffer, format))
}
