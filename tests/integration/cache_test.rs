//! Integration tests for the bounded caches

use wallpipe::cache::{DEFAULT_BOUNDED_CAPACITY, DEFAULT_LRU_CAPACITY};
use wallpipe::{BoundedMap, LruCache, PopularityEntry};

#[test]
fn lru_keeps_recently_read_pages() {
    let mut pages: LruCache<String, Vec<String>> = LruCache::new(3);
    pages.set("nature:1".to_string(), vec!["a.png".to_string()]);
    pages.set("nature:2".to_string(), vec!["b.png".to_string()]);
    pages.set("urban:1".to_string(), vec!["c.png".to_string()]);

    // Reading page 1 makes page 2 the eviction candidate
    assert!(pages.get("nature:1").is_some());
    let evicted = pages.set("space:1".to_string(), Vec::new());

    assert_eq!(evicted.map(|(key, _)| key), Some("nature:2".to_string()));
    assert_eq!(pages.len(), 3);
    assert!(pages.contains_key("nature:1"));
}

#[test]
fn lru_prefix_invalidation_drops_a_namespace() {
    let mut pages: LruCache<String, usize> = LruCache::default();
    assert_eq!(pages.capacity(), DEFAULT_LRU_CAPACITY);
    for (i, key) in ["nature:1", "nature:2", "urban:1", "natured:1"].iter().enumerate() {
        pages.set(key.to_string(), i);
    }

    assert_eq!(pages.remove_by_prefix("nature:"), 2);
    let keys: Vec<&String> = pages.keys().collect();
    assert_eq!(keys, vec!["urban:1", "natured:1"]);
    assert_eq!(pages.remove_by_prefix("missing:"), 0);
}

#[test]
fn lru_miss_does_not_insert() {
    let mut cache: LruCache<String, u8> = LruCache::new(2);
    assert!(cache.get("nothing").is_none());
    assert!(cache.is_empty());
}

#[test]
fn bounded_map_tracks_statistics_under_churn() {
    let mut stats: BoundedMap<String, PopularityEntry> = BoundedMap::new(50);
    let mut evicted_total = 0;
    for i in 0..200 {
        let entry = PopularityEntry {
            downloads: i,
            ..Default::default()
        };
        evicted_total += stats.set(format!("wall-{i:03}.png"), entry).len();
        assert!(stats.len() <= 50);
    }

    assert_eq!(evicted_total + stats.len(), 200);
    // The newest insertions always survive
    assert_eq!(stats.get("wall-199.png").map(|e| e.downloads), Some(199));
    assert!(!stats.contains_key("wall-000.png"));

    let keys: Vec<&String> = stats.keys().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn bounded_map_default_capacity() {
    let map: BoundedMap<String, u32> = BoundedMap::default();
    assert_eq!(map.capacity(), DEFAULT_BOUNDED_CAPACITY);
    assert_eq!(map.eviction_batch(), DEFAULT_BOUNDED_CAPACITY / 5);
}
