// Test harness for integration tests
// Builds image fixtures and handlers wired to an in-memory store.

use image::{DynamicImage, ImageOutputFormat, RgbImage, RgbaImage};
use inkstamp::config::StorageConfig;
use inkstamp::fetcher::MemoryAssetFetcher;
use inkstamp::handler::WatermarkHandler;
use std::io::Cursor;
use std::sync::Arc;

pub const BUCKET: &str = "watermark-test";
pub const WATERMARK_KEY: &str = "watermark.png";

/// Solid-color PNG with an alpha channel
pub fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, image::Rgba(color));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image)
        .write_to(&mut out, ImageOutputFormat::Png)
        .expect("encode png fixture");
    out.into_inner()
}

/// Solid-color JPEG
pub fn jpeg(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, image::Rgb(color));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut out, ImageOutputFormat::Jpeg(90))
        .expect("encode jpeg fixture");
    out.into_inner()
}

pub fn storage() -> StorageConfig {
    StorageConfig {
        bucket_name: BUCKET.to_string(),
        watermark_image_name: WATERMARK_KEY.to_string(),
        local_root: None,
    }
}

/// Store seeded with a 100x50 semi-transparent white watermark
pub fn store_with_watermark() -> Arc<MemoryAssetFetcher> {
    let store = Arc::new(MemoryAssetFetcher::new());
    store.insert(BUCKET, WATERMARK_KEY, png(100, 50, [255, 255, 255, 160]));
    store
}

pub fn handler_for(store: Arc<MemoryAssetFetcher>) -> Arc<WatermarkHandler> {
    Arc::new(WatermarkHandler::new(store, &storage()))
}

/// Absolute per-channel difference, ignoring alpha
pub fn color_distance(a: image::Rgba<u8>, b: [u8; 3]) -> u32 {
    (0..3)
        .map(|c| (i32::from(a[c]) - i32::from(b[c])).unsigned_abs())
        .sum()
}
