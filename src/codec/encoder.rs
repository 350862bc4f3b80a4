//! Fixed-format JPEG encoder

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, ImageEncoder};
use std::io::Cursor;

use super::{CodecError, PixelBuffer};
use crate::constants::{CONTENT_TYPE_JPEG, DEFAULT_JPEG_QUALITY};

/// Result of encoding an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// The encoded image data
    pub data: Vec<u8>,
    /// Content-Type header value
    pub content_type: &'static str,
}

impl EncodedImage {
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            data,
            content_type: CONTENT_TYPE_JPEG,
        }
    }
}

/// Encode a pixel buffer as baseline JPEG at the standard quality.
///
/// JPEG has no alpha channel; translucent pixels are flattened onto black.
pub fn encode(buffer: &PixelBuffer) -> Result<EncodedImage, CodecError> {
    let (width, height) = buffer.dimensions();
    let rgb_data = flatten_to_rgb(buffer.as_rgba().as_raw());

    let mut output = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut output, DEFAULT_JPEG_QUALITY);

    encoder
        .write_image(&rgb_data, width, height, ColorType::Rgb8)
        .map_err(|e| CodecError::encode_failure("jpeg", e.to_string()))?;

    Ok(EncodedImage::jpeg(output.into_inner()))
}

/// Convert straight RGBA to RGB composited over black.
fn flatten_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = px[3] as u16;
        if a == 255 {
            rgb.extend_from_slice(&px[..3]);
        } else {
            rgb.push(((px[0] as u16 * a + 127) / 255) as u8);
            rgb.push(((px[1] as u16 * a + 127) / 255) as u8);
            rgb.push(((px[2] as u16 * a + 127) / 255) as u8);
        }
    }
    rgb
}
