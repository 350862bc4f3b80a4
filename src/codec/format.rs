//! Header-signature format detection
//!
//! Only formats whose decoders are compiled in are reported. A header that
//! the `image` crate recognizes but that is outside this set (BMP, TIFF, ...)
//! is treated the same as an unknown header.

use image::ImageFormat;
use std::fmt;

/// Input formats the codec can decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl FormatTag {
    /// Every supported input format
    pub const SUPPORTED: [FormatTag; 4] = [
        FormatTag::Png,
        FormatTag::Jpeg,
        FormatTag::Gif,
        FormatTag::WebP,
    ];

    /// Identify the format from the leading magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match image::guess_format(data).ok()? {
            ImageFormat::Png => Some(FormatTag::Png),
            ImageFormat::Jpeg => Some(FormatTag::Jpeg),
            ImageFormat::Gif => Some(FormatTag::Gif),
            ImageFormat::WebP => Some(FormatTag::WebP),
            _ => None,
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            FormatTag::Png => ImageFormat::Png,
            FormatTag::Jpeg => ImageFormat::Jpeg,
            FormatTag::Gif => ImageFormat::Gif,
            FormatTag::WebP => ImageFormat::WebP,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FormatTag::Png => "png",
            FormatTag::Jpeg => "jpeg",
            FormatTag::Gif => "gif",
            FormatTag::WebP => "webp",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            FormatTag::Png => "image/png",
            FormatTag::Jpeg => "image/jpeg",
            FormatTag::Gif => "image/gif",
            FormatTag::WebP => "image/webp",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Short description of an unrecognized header for error messages.
pub(crate) fn describe_header(data: &[u8]) -> String {
    match image::guess_format(data) {
        Ok(format) => format!("{:?}", format).to_lowercase(),
        Err(_) if data.is_empty() => "empty input".to_string(),
        Err(_) => "unknown".to_string(),
    }
}
