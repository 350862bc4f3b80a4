// Local asset directory tests
//
// Runs the full handler against `LocalAssetFetcher`, the backend used when
// `local_root` is configured for development.

use inkstamp::config::{Config, StorageConfig};
use inkstamp::fetcher::LocalAssetFetcher;
use inkstamp::handler::{ApiRequest, ApiResponse, WatermarkHandler};
use std::sync::Arc;
use tempfile::TempDir;

use super::test_harness::{jpeg, png};

fn asset_dir() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let bucket = dir.path().join("assets");
    std::fs::create_dir_all(bucket.join("gallery")).unwrap();
    std::fs::write(bucket.join("logo.png"), png(30, 10, [0, 0, 0, 200])).unwrap();
    std::fs::write(bucket.join("gallery/sunset.jpg"), jpeg(200, 150, [250, 120, 40])).unwrap();
    dir
}

fn handler(dir: &TempDir) -> WatermarkHandler {
    let storage = StorageConfig {
        bucket_name: "assets".to_string(),
        watermark_image_name: "logo.png".to_string(),
        local_root: Some(dir.path().to_path_buf()),
    };
    WatermarkHandler::new(Arc::new(LocalAssetFetcher::new(dir.path())), &storage)
}

#[tokio::test]
async fn test_local_assets_are_watermarked() {
    let dir = asset_dir();
    let handler = handler(&dir);

    let response = handler
        .handle(&ApiRequest::with_image_key("gallery/sunset.jpg"))
        .await;

    assert_eq!(response.status_code, 200);
    let (output, _) = inkstamp::codec::decode(&response.body_bytes().unwrap()).unwrap();
    assert_eq!(output.dimensions(), (200, 150));
}

#[tokio::test]
async fn test_escaping_the_bucket_is_not_found() {
    let dir = asset_dir();
    std::fs::write(dir.path().join("secret.png"), png(5, 5, [1, 2, 3, 255])).unwrap();
    let handler = handler(&dir);

    let response = handler
        .handle(&ApiRequest::with_image_key("../secret.png"))
        .await;

    assert_eq!(response, ApiResponse::not_found());
}

#[tokio::test]
async fn test_env_config_selects_local_root() {
    let dir = asset_dir();
    let root = dir.path().to_string_lossy().into_owned();
    let config = Config::from_lookup(|name: &str| match name {
        "S3_BUCKET_NAME" => Some("assets".to_string()),
        "WATERMARK_IMAGE_NAME" => Some("logo.png".to_string()),
        "LOCAL_ASSET_ROOT" => Some(root.clone()),
        _ => None,
    })
    .unwrap();

    let local_root = config.storage.local_root.clone().expect("local root");
    let handler = WatermarkHandler::new(
        Arc::new(LocalAssetFetcher::new(local_root)),
        &config.storage,
    );

    let response = handler
        .handle(&ApiRequest::with_image_key("logo.png"))
        .await;
    assert_eq!(response.status_code, 200);
}
