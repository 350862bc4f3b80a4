// Inkstamp watermarking service library

pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetcher;
pub mod handler;
pub mod logging;
pub mod server;
pub mod watermark;
