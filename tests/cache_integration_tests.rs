//! Integration Tests for the cache public API
//!
//! Drives full eviction scenarios through `PriorityExpiryCache`,
//! `SharedCache` and the command driver.

use priority_expiry_cache::command::Command;
use priority_expiry_cache::{PriorityExpiryCache, SharedCache, Timestamp};

// == Helper Functions ==

fn sorted_keys<V>(cache: &PriorityExpiryCache<V>) -> Vec<String> {
    let mut keys = cache.keys();
    keys.sort();
    keys
}

fn seeded_cache(now: Timestamp) -> PriorityExpiryCache<u32> {
    let mut cache = PriorityExpiryCache::new(5);
    cache.set("A", 1, 5, 100, now);
    cache.set("B", 2, 15, 3, now);
    cache.set("C", 3, 5, 10, now);
    cache.set("D", 4, 1, 15, now);
    cache.set("E", 5, 5, 150, now);
    cache
}

// == Resize Scenario ==

#[test]
fn test_shrinking_capacity_follows_eviction_order() {
    let mut cache = seeded_cache(0);
    assert_eq!(cache.get("C", 0), Some(&3));

    cache.set_max_items(5, 0);
    assert_eq!(sorted_keys(&cache), vec!["A", "B", "C", "D", "E"]);

    // "B" is expired (3 <= 5)
    cache.set_max_items(4, 5);
    assert_eq!(sorted_keys(&cache), vec!["A", "C", "D", "E"]);

    // "D" has the lowest priority; its expiry is irrelevant
    cache.set_max_items(3, 5);
    assert_eq!(sorted_keys(&cache), vec!["A", "C", "E"]);

    // "A" is the least recently used of priority 5
    cache.set_max_items(2, 5);
    assert_eq!(sorted_keys(&cache), vec!["C", "E"]);

    // "C" was read, so "E" goes
    cache.set_max_items(1, 5);
    assert_eq!(sorted_keys(&cache), vec!["C"]);
}

// == Set Scenario ==

#[test]
fn test_set_evicts_expired_then_lowest_then_lru() {
    let mut cache = PriorityExpiryCache::new(3);
    cache.set("A", 1, 5, 100, 0);
    cache.set("B", 2, 15, 3, 0);
    cache.set("C", 3, 5, 10, 0);
    assert_eq!(sorted_keys(&cache), vec!["A", "B", "C"]);

    // B has expired by t=4
    cache.set("D", 4, 1, 20, 4);
    assert_eq!(sorted_keys(&cache), vec!["A", "C", "D"]);

    // Nothing expired: D has the lowest priority
    cache.set("E", 5, 20, 100, 5);
    assert_eq!(sorted_keys(&cache), vec!["A", "C", "E"]);

    // A was read, so C is the LRU of priority 5
    assert_eq!(cache.get("A", 6), Some(&1));
    cache.set("F", 6, 100, 12, 7);
    assert_eq!(sorted_keys(&cache), vec!["A", "E", "F"]);

    // F expired at t=12 and goes first despite its high priority
    cache.set("G", 7, 1, 20, 12);
    assert_eq!(sorted_keys(&cache), vec!["A", "E", "G"]);
}

#[test]
fn test_get_boundary_and_miss() {
    let mut cache = PriorityExpiryCache::new(10);
    cache.set("A", 1, 5, 4, 1);
    cache.set("B", 2, 15, 4, 1);

    assert_eq!(cache.get("B", 3), Some(&2));
    assert_eq!(cache.get("B", 4), None);
    assert_eq!(cache.get("D", 4), None);
    assert_eq!(sorted_keys(&cache), vec!["A"]);
}

#[test]
fn test_reprioritised_key_leaves_old_tier() {
    let mut cache = PriorityExpiryCache::new(2);
    cache.set("x", 1, 1, 100, 0);
    cache.set("y", 2, 3, 100, 0);
    cache.set("x", 3, 5, 100, 0);

    assert_eq!(cache.lowest_priority(), Some(3));
    assert_eq!(cache.tier_len(1), 0);

    // y is now the lowest priority entry
    cache.set("z", 4, 4, 100, 0);
    assert_eq!(sorted_keys(&cache), vec!["x", "z"]);
}

// == Shared Handle ==

#[tokio::test]
async fn test_shared_cache_across_tasks() {
    let cache = SharedCache::with_max_items(4);

    let writer = {
        let cache = cache.clone();
        tokio::spawn(async move {
            for i in 0..10u32 {
                cache.set_at(format!("k{}", i), i, i64::from(i % 2), 1_000, 0).await;
            }
        })
    };
    writer.await.unwrap();

    // Odd keys have priority 1, so the four newest odd keys survive.
    let mut keys = cache.keys().await;
    keys.sort();
    assert_eq!(keys, vec!["k3", "k5", "k7", "k9"]);
    assert_eq!(cache.get_at("k9", 0).await, Some(9));
}

#[tokio::test]
async fn test_shared_cache_negative_capacity_drains() {
    let cache = SharedCache::with_max_items(3);
    for key in ["a", "b", "c"] {
        cache.set_at(key, 1u32, 1, 1_000, 0).await;
    }

    cache.set_max_items_at(-5, 0).await;
    assert_eq!(cache.len().await, 0);

    cache.set_at("d", 4u32, 9, 1_000, 0).await;
    assert_eq!(cache.get_at("d", 0).await, None);
    assert_eq!(cache.stats().await.evictions, 4);
}

// == Command Driver ==

#[tokio::test]
async fn test_command_script_round_trip() {
    let cache = SharedCache::with_max_items(2);
    let script = "\
        # three writes into a cache of two\n\
        @0 SET a 1 1 10000\n\
        @0 SET b 2 1 10000\n\
        @0 SET c 3 1 10000\n\
        @0 KEYS\n\
        @0 GET a\n";

    let mut replies = Vec::new();
    for line in script.lines() {
        if let Some(invocation) = Command::parse_line(line).unwrap() {
            replies.push(invocation.execute(&cache).await.unwrap());
        }
    }

    assert_eq!(replies, vec!["OK", "OK", "OK", "b c", "(nil)"]);
}
