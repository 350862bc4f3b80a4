// Concurrent Request Handling Integration Tests
//
// Cold-cache behavior under simultaneous requests:
// - every concurrent first request succeeds
// - the watermark asset is fetched and decoded exactly once
// - all requests see the same decoded watermark

use futures::future::join_all;
use inkstamp::handler::ApiRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

use super::test_harness::{handler_for, png, storage, BUCKET, WATERMARK_KEY};

const CONCURRENT_REQUESTS: usize = 16;

fn slow_store() -> Arc<inkstamp::fetcher::MemoryAssetFetcher> {
    // Latency keeps every request inside the populate window
    let store = Arc::new(
        inkstamp::fetcher::MemoryAssetFetcher::new().with_latency(Duration::from_millis(50)),
    );
    store.insert(BUCKET, WATERMARK_KEY, png(100, 50, [255, 255, 255, 128]));
    for i in 0..CONCURRENT_REQUESTS {
        store.insert(BUCKET, &format!("photo-{i}.png"), png(320, 240, [i as u8, 0, 0, 255]));
    }
    store
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cold_cache_spawned_requests_fetch_watermark_once() {
    let store = slow_store();
    let handler = handler_for(store.clone());

    let mut tasks = JoinSet::new();
    for i in 0..CONCURRENT_REQUESTS {
        let handler = Arc::clone(&handler);
        tasks.spawn(async move {
            handler
                .handle(&ApiRequest::with_image_key(format!("photo-{i}.png")))
                .await
        });
    }

    let mut ok = 0;
    while let Some(result) = tasks.join_next().await {
        let response = result.expect("request task panicked");
        assert_eq!(response.status_code, 200);
        ok += 1;
    }

    assert_eq!(ok, CONCURRENT_REQUESTS);
    assert_eq!(store.fetch_count(BUCKET, WATERMARK_KEY), 1);
    assert_eq!(
        store.total_fetches(),
        CONCURRENT_REQUESTS + 1,
        "one fetch per source image plus one watermark fetch"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_cache_readers_share_one_buffer() {
    let store = slow_store();
    let handler = handler_for(store.clone());

    let loads = (0..CONCURRENT_REQUESTS).map(|_| {
        let handler = Arc::clone(&handler);
        async move { handler.watermark_cache().get_watermark().await }
    });
    let buffers: Vec<_> = join_all(loads)
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .expect("watermark loads");

    assert_eq!(store.fetch_count(BUCKET, WATERMARK_KEY), 1);
    let first = &buffers[0];
    assert_eq!(first.dimensions(), (100, 50));
    for buffer in &buffers[1..] {
        assert!(Arc::ptr_eq(first, buffer));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_failures_are_not_cached() {
    let store = slow_store();
    store.fail_with(BUCKET, WATERMARK_KEY, "connection reset");
    let handler = Arc::new(inkstamp::handler::WatermarkHandler::new(
        store.clone(),
        &storage(),
    ));

    let requests = (0..4).map(|i| {
        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            handler
                .handle(&ApiRequest::with_image_key(format!("photo-{i}.png")))
                .await
        })
    });
    for response in join_all(requests).await {
        assert_eq!(response.unwrap().status_code, 500);
    }
    // Each waiter retries the load after the previous attempt failed
    assert!(store.fetch_count(BUCKET, WATERMARK_KEY) >= 1);

    store.clear_failure(BUCKET, WATERMARK_KEY);
    let response = handler
        .handle(&ApiRequest::with_image_key("photo-0.png"))
        .await;
    assert_eq!(response.status_code, 200);
    assert!(handler.watermark_cache().is_populated());
}
