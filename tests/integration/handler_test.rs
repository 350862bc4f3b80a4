// End-to-end handler tests
//
// Drives `WatermarkHandler::handle` with gateway-shaped requests against an
// in-memory store and checks the externally visible outcome:
// - empty and unknown keys are 404
// - valid images come back as base64 JPEG with the watermark blended in
// - corrupt source bytes are 500
// - the watermark asset is fetched once per process

use inkstamp::codec::{self, FormatTag};
use inkstamp::handler::{ApiRequest, ApiResponse};

use super::test_harness::{
    color_distance, handler_for, jpeg, png, store_with_watermark, BUCKET, WATERMARK_KEY,
};

const BASE_COLOR: [u8; 3] = [20, 40, 200];

#[tokio::test]
async fn test_empty_image_key_is_not_found() {
    let handler = handler_for(store_with_watermark());

    let response = handler.handle(&ApiRequest::with_image_key("")).await;

    assert_eq!(response.status_code, 404);
    assert_eq!(response.body, "Not Found");
    assert_eq!(response.content_type(), Some("text/plain"));
}

#[tokio::test]
async fn test_unknown_image_key_is_not_found() {
    let store = store_with_watermark();
    let handler = handler_for(store.clone());

    let response = handler
        .handle(&ApiRequest::with_image_key("missing.png"))
        .await;

    assert_eq!(response, ApiResponse::not_found());
    assert_eq!(store.fetch_count(BUCKET, "missing.png"), 1);
}

#[tokio::test]
async fn test_valid_image_is_watermarked() {
    let store = store_with_watermark();
    store.insert(BUCKET, "photo.png", jpeg(800, 600, BASE_COLOR));
    let handler = handler_for(store);

    let response = handler
        .handle(&ApiRequest::with_image_key("photo.png"))
        .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type(), Some("image/jpeg"));
    assert!(response.is_base64_encoded);

    let body = response.body_bytes().expect("base64 body");
    let (output, format) = codec::decode(&body).expect("decodable output");
    assert_eq!(format, FormatTag::Jpeg);
    assert_eq!(output.dimensions(), (800, 600));

    // Watermark covers (350, 275)..(450, 325)
    let center = output.pixel(400, 300).unwrap();
    assert!(
        color_distance(center, BASE_COLOR) > 150,
        "center pixel {:?} should be blended",
        center
    );

    // Far from the watermark only lossy drift remains
    for (x, y) in [(10, 10), (790, 10), (10, 590), (790, 590), (330, 300)] {
        let pixel = output.pixel(x, y).unwrap();
        assert!(
            color_distance(pixel, BASE_COLOR) < 30,
            "pixel ({x}, {y}) = {:?} should keep the base color",
            pixel
        );
    }
}

#[tokio::test]
async fn test_truncated_image_is_internal_error() {
    let store = store_with_watermark();
    let mut data = png(800, 600, [20, 40, 200, 255]);
    data.truncate(data.len() / 2);
    store.insert(BUCKET, "broken.png", data);
    let handler = handler_for(store);

    let response = handler
        .handle(&ApiRequest::with_image_key("broken.png"))
        .await;

    assert_eq!(response, ApiResponse::internal_server_error());
}

#[tokio::test]
async fn test_watermark_is_fetched_once_across_requests() {
    let store = store_with_watermark();
    store.insert(BUCKET, "a.png", png(200, 100, [0, 0, 0, 255]));
    store.insert(BUCKET, "b.jpg", jpeg(300, 300, [255, 255, 0]));
    let handler = handler_for(store.clone());

    for key in ["a.png", "b.jpg", "a.png", "missing.png"] {
        handler.handle(&ApiRequest::with_image_key(key)).await;
    }

    assert_eq!(store.fetch_count(BUCKET, WATERMARK_KEY), 1);
    assert_eq!(store.fetch_count(BUCKET, "a.png"), 2);
    assert!(handler.watermark_cache().is_populated());
}

#[tokio::test]
async fn test_missing_watermark_recovers_once_uploaded() {
    let store = std::sync::Arc::new(inkstamp::fetcher::MemoryAssetFetcher::new());
    store.insert(BUCKET, "photo.png", png(120, 80, [10, 10, 10, 255]));
    let handler = handler_for(store.clone());

    let first = handler
        .handle(&ApiRequest::with_image_key("photo.png"))
        .await;
    assert_eq!(first.status_code, 500);
    assert!(!handler.watermark_cache().is_populated());

    store.insert(BUCKET, WATERMARK_KEY, png(20, 20, [255, 0, 0, 255]));
    let second = handler
        .handle(&ApiRequest::with_image_key("photo.png"))
        .await;
    assert_eq!(second.status_code, 200);
    assert_eq!(store.fetch_count(BUCKET, WATERMARK_KEY), 2);
}

#[tokio::test]
async fn test_output_keeps_base_dimensions() {
    let store = store_with_watermark();
    let sizes = [(800, 600), (100, 50), (60, 30), (1, 1), (101, 51)];
    for (i, (w, h)) in sizes.iter().enumerate() {
        store.insert(BUCKET, &format!("img-{i}.png"), png(*w, *h, [90, 90, 90, 255]));
    }
    let handler = handler_for(store);

    for (i, (w, h)) in sizes.iter().enumerate() {
        let response = handler
            .handle(&ApiRequest::with_image_key(format!("img-{i}.png")))
            .await;
        assert_eq!(response.status_code, 200, "size {w}x{h}");

        let body = response.body_bytes().unwrap();
        let (output, _) = codec::decode(&body).unwrap();
        assert_eq!(output.dimensions(), (*w, *h));
    }
}

#[tokio::test]
async fn test_gateway_event_json_round_trip() {
    let store = store_with_watermark();
    store.insert(BUCKET, "photo.png", png(64, 64, [0, 128, 0, 255]));
    let handler = handler_for(store);

    let event = r#"{"httpMethod": "GET", "pathParameters": {"imageKey": "photo.png"}}"#;
    let request: ApiRequest = serde_json::from_str(event).unwrap();
    let response = handler.handle(&request).await;

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["isBase64Encoded"], true);
    assert_eq!(json["headers"]["Content-Type"], "image/jpeg");
    assert!(json["body"].as_str().unwrap().starts_with("/9j/"));
}
