//! Decoded RGBA8 raster.

use image::{Rgba, RgbaImage};

/// A decoded image: straight (non-premultiplied) RGBA, 8 bits per channel,
/// row-major.
///
/// Width and height are always non-zero. Buffers are moved from stage to
/// stage; the only shared instance is the cached watermark, which is
/// handed out behind an `Arc` and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Wrap an RGBA image. Returns `None` for zero-sized images.
    pub fn from_rgba(image: RgbaImage) -> Option<Self> {
        if image.width() == 0 || image.height() == 0 {
            return None;
        }
        Some(Self { image })
    }

    /// Buffer filled with a single color. Returns `None` for zero sizes.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Option<Self> {
        Self::from_rgba(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    /// Re-wrap a canvas whose dimensions came from an existing buffer.
    pub(crate) fn from_canvas(image: RgbaImage) -> Self {
        debug_assert!(image.width() > 0 && image.height() > 0);
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Pixel at `(x, y)`, or `None` outside the bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("dimensions", &self.dimensions())
            .finish()
    }
}
