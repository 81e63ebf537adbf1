//! Integration tests for the dispatch facade and background executor

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::json;
use wallpipe::codec;
use wallpipe::sorting;
use wallpipe::worker::Request;
use wallpipe::{
    DispatchConfig, Dispatcher, Executor, ExecutorConfig, Filters, PopularityMap, SortOptions,
    SortOrder, Wallpaper,
};

use crate::helpers::{synthetic_catalog, synthetic_popularity, Behavior, StubHost, UnsupportedHost};

fn over(host: impl wallpipe::worker::WorkerHost + 'static, timeout: Duration) -> Dispatcher {
    let executor = Executor::with_host(Arc::new(host), ExecutorConfig { timeout });
    Dispatcher::new(Arc::new(executor), DispatchConfig::default())
}

// ============================================================================
// Threshold
// ============================================================================

#[tokio::test]
async fn ninety_nine_records_never_reach_the_worker() {
    let host = StubHost::new(Behavior::Handle);
    let posts = Arc::clone(&host.posts);
    let dispatcher = over(host, Duration::from_secs(10));
    let records = synthetic_catalog(99);

    dispatcher
        .filter_and_sort(&records, &Filters::new(), "newest", &PopularityMap::new())
        .await;
    assert_eq!(posts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn one_hundred_one_records_reach_the_worker() {
    let host = StubHost::new(Behavior::Handle);
    let posts = Arc::clone(&host.posts);
    let dispatcher = over(host, Duration::from_secs(10));
    let records = synthetic_catalog(101);

    let result = dispatcher
        .try_filter_and_sort(&records, &Filters::new(), "newest", &PopularityMap::new())
        .await;
    assert!(result.is_some());
    assert_eq!(posts.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Fallback parity
// ============================================================================

#[tokio::test]
async fn failing_worker_matches_inline_results() {
    let records = synthetic_catalog(250);
    let stats = synthetic_popularity(&records);
    let filters = Filters::new().format("png").category("nature");
    let payload = codec::encode(r#"{"wallpapers":[]}"#);

    for host in [StubHost::new(Behavior::Fail), StubHost::new(Behavior::Handle)] {
        let dispatcher = over(host, Duration::from_secs(10));

        for method in ["popular", "downloads", "views", "smallest", "name-desc", "bogus"] {
            assert_eq!(
                dispatcher.filter_and_sort(&records, &filters, method, &stats).await,
                sorting::filter_and_sort(&records, &filters, method, &stats),
                "method {method}"
            );
        }
        assert_eq!(
            dispatcher
                .sort("sortBySize", &records, &SortOptions::Order(SortOrder::Asc))
                .await
                .unwrap(),
            sorting::sort_by_size(&records, SortOrder::Asc)
        );
        assert_eq!(
            dispatcher.decode_and_parse(&payload).await.unwrap(),
            json!({"wallpapers": []})
        );
    }
}

#[tokio::test]
async fn unsupported_host_degrades_to_inline() {
    let dispatcher = over(UnsupportedHost, Duration::from_secs(10));
    let records = synthetic_catalog(300);

    assert_eq!(dispatcher.decode(&codec::encode("still works")).await.unwrap(), "still works");
    assert_eq!(
        dispatcher
            .filter_and_sort(&records, &Filters::new().query("tag3"), "oldest", &PopularityMap::new())
            .await,
        sorting::filter_and_sort(&records, &Filters::new().query("tag3"), "oldest", &PopularityMap::new())
    );
}

#[tokio::test]
async fn background_sort_keeps_sub_millisecond_order() {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    // Every record falls in the same millisecond; only microseconds differ
    let records: Vec<Wallpaper> = (0..101)
        .map(|i| Wallpaper::new(format!("shot-{i:03}.png"), base + chrono::Duration::microseconds(i)))
        .collect();
    let host = StubHost::new(Behavior::Handle);
    let posts = Arc::clone(&host.posts);
    let dispatcher = over(host, Duration::from_secs(10));

    let background = dispatcher
        .try_filter_and_sort(&records, &Filters::new(), "newest", &PopularityMap::new())
        .await
        .unwrap();

    assert_eq!(posts.load(Ordering::SeqCst), 1);
    assert_eq!(background[0].filename, "shot-100.png");
    assert_eq!(
        background,
        sorting::filter_and_sort(&records, &Filters::new(), "newest", &PopularityMap::new())
    );
}

// ============================================================================
// Timeout
// ============================================================================

#[tokio::test(start_paused = true)]
async fn silent_worker_falls_back_after_the_deadline_not_before() {
    let deadline = Duration::from_secs(10);
    let dispatcher = over(StubHost::new(Behavior::Silent), deadline);
    let records = synthetic_catalog(150);

    let started = tokio::time::Instant::now();
    let result = dispatcher
        .filter_and_sort(&records, &Filters::new(), "largest", &PopularityMap::new())
        .await;
    let waited = started.elapsed();

    assert!(waited >= deadline, "fell back after {waited:?}");
    assert!(waited < deadline + Duration::from_secs(1));
    assert_eq!(
        result,
        sorting::filter_and_sort(&records, &Filters::new(), "largest", &PopularityMap::new())
    );
}

// ============================================================================
// Executor over a real worker thread
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_requests_are_correlated() {
    let executor = Arc::new(Executor::new(ExecutorConfig::default()));

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let executor = Arc::clone(&executor);
            tokio::spawn(async move {
                let text = format!("payload number {i}");
                let value = executor.request(Request::decode(codec::encode(&text))).await;
                (text, value)
            })
        })
        .collect();

    for task in tasks {
        let (text, value) = task.await.unwrap();
        assert_eq!(value.unwrap(), json!(text));
    }
    assert_eq!(executor.pending_count(), 0);
}

#[tokio::test]
async fn teardown_then_reuse() {
    let executor = Arc::new(Executor::new(ExecutorConfig::default()));
    let dispatcher = Dispatcher::new(Arc::clone(&executor), DispatchConfig::default());

    assert_eq!(dispatcher.decode(&codec::encode("one")).await.unwrap(), "one");
    executor.close();
    assert!(!executor.is_open());

    assert_eq!(dispatcher.decode(&codec::encode("two")).await.unwrap(), "two");
    assert!(executor.is_open());
}

#[tokio::test]
async fn inline_only_dispatcher_matches_engine() {
    let records = synthetic_catalog(120);
    let stats = synthetic_popularity(&records);
    let dispatcher = Dispatcher::inline_only();

    assert!(dispatcher.executor().is_none());
    assert_eq!(
        dispatcher
            .sort("sortByPopularity", &records, &SortOptions::Popularity(stats.clone()))
            .await
            .unwrap(),
        sorting::sort_by_popularity(&records, &stats)
    );
}
