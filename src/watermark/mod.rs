//! Watermark module: the cached watermark asset and the compositor that
//! blends it onto source images.
//!
//! # Features
//!
//! - **Process-wide cache** of the decoded watermark, loaded lazily once
//! - **Centered placement** with clipping when the watermark is larger
//!   than the image
//! - **Porter-Duff "over"** blending on straight-alpha RGBA

pub mod cache;
pub mod compositor;
pub mod error;

// Re-export main types for convenience
pub use cache::WatermarkCache;
pub use compositor::{blend_over, centered_offset, composite};
pub use error::WatermarkError;
