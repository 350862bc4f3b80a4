//! Watermark compositor for blending the watermark onto images.
//!
//! The watermark is centered on the base image and drawn with the
//! Porter-Duff "over" operator. Output always has the base image's
//! dimensions; watermark pixels that fall outside the canvas are skipped.

use image::{Rgba, RgbaImage};

use crate::codec::PixelBuffer;

/// Top-left corner of the watermark when centered on the base image.
///
/// Uses truncating signed division, so a watermark larger than the base
/// gets a negative offset and is clipped on both sides.
pub fn centered_offset(base: (u32, u32), watermark: (u32, u32)) -> (i64, i64) {
    let dx = (base.0 as i64 - watermark.0 as i64) / 2;
    let dy = (base.1 as i64 - watermark.1 as i64) / 2;
    (dx, dy)
}

/// Composite `watermark` centered over `base`.
///
/// The base buffer is consumed and becomes the output canvas: it already
/// holds the straight copy of the base pixels, and its bounds are the
/// output bounds.
pub fn composite(base: PixelBuffer, watermark: &PixelBuffer) -> PixelBuffer {
    let (x, y) = centered_offset(base.dimensions(), watermark.dimensions());
    let mut canvas = base.into_rgba();
    draw_over(&mut canvas, watermark.as_rgba(), x, y);
    PixelBuffer::from_canvas(canvas)
}

/// Draw `layer` onto `canvas` with its top-left corner at `(x, y)`.
fn draw_over(canvas: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    let canvas_width = canvas.width() as i64;
    let canvas_height = canvas.height() as i64;

    // Visible region, clamped to the canvas
    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + layer.width() as i64).min(canvas_width);
    let y_end = (y + layer.height() as i64).min(canvas_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let src = *layer.get_pixel((tx - x) as u32, (ty - y) as u32);
            let dst = canvas.get_pixel_mut(tx as u32, ty as u32);
            *dst = blend_over(*dst, src);
        }
    }
}

/// Porter-Duff "over" on straight-alpha pixels.
///
/// In premultiplied space: `out = src + dst * (1 - src.alpha)`. The result
/// is converted back to straight alpha for storage.
pub fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        255 => return src,
        0 => return dst,
        _ => {}
    }

    let src_alpha = src[3] as f32 / 255.0;
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);

    if out_alpha <= f32::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| -> u8 {
        let premultiplied =
            s as f32 * src_alpha + d as f32 * dst_alpha * (1.0 - src_alpha);
        (premultiplied / out_alpha).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
