//! Cache Store Module
//!
//! Main cache engine combining the key index, the expiry heap and the
//! priority tier lists.
//!
//! Eviction policy, applied until the cache fits its capacity:
//! 1. the entry with the earliest expiration time, if it has expired;
//! 2. otherwise the least recently used entry of the lowest priority tier.
//!
//! Expiry is lazy: it is enforced when `get` observes an entry or when an
//! eviction pass runs, never by a timer inside the store.

use tracing::debug;

use crate::cache::arena::{EntryArena, EntryId};
use crate::cache::entry::{Entry, Timestamp};
use crate::cache::expiry_heap::ExpiryHeap;
use crate::cache::index::KeyIndex;
use crate::cache::stats::CacheStats;
use crate::cache::tiers::PriorityTiers;

/// Why an entry left the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    Expired,
    Evicted,
    Deleted,
}

// == Priority Expiry Cache ==
/// Cache with expiry-first, then priority/LRU eviction.
///
/// Not synchronized; wrap it in [`crate::SharedCache`] to share it.
#[derive(Debug)]
pub struct PriorityExpiryCache<V> {
    /// Owner of every live entry
    entries: EntryArena<V>,
    /// Key -> entry handle
    index: KeyIndex,
    /// Entries ordered by expiration time
    expiry: ExpiryHeap,
    /// Entries grouped by priority, each group in recency order
    tiers: PriorityTiers,
    /// Performance statistics
    stats: CacheStats,
    /// Capacity; zero or negative keeps the cache empty
    max_items: i64,
}

impl<V> PriorityExpiryCache<V> {
    // == Constructor ==
    /// Creates an empty cache. Any `max_items` is accepted.
    pub fn new(max_items: i64) -> Self {
        Self {
            entries: EntryArena::new(),
            index: KeyIndex::new(),
            expiry: ExpiryHeap::new(),
            tiers: PriorityTiers::new(),
            stats: CacheStats::new(),
            max_items,
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit moves the entry to the front of its tier. An entry found expired
    /// at `now` is evicted and reported as a miss.
    pub fn get(&mut self, key: &str, now: Timestamp) -> Option<&V> {
        let Some(id) = self.index.lookup(key) else {
            self.stats.record_miss();
            return None;
        };

        if self.entries[id].is_expired(now) {
            self.discard(id, Removal::Expired);
            self.stats.record_miss();
            return None;
        }

        self.tiers.touch(&mut self.entries, id);
        self.stats.record_hit();
        Some(&self.entries[id].value)
    }

    // == Set ==
    /// Stores a value, then evicts until the cache fits its capacity.
    ///
    /// An existing key keeps its entry: value, priority and expiration are
    /// replaced in place and the entry becomes the most recently used of its
    /// (possibly new) tier. The write itself never fails; with a capacity of
    /// zero or less it is evicted again before returning.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: V,
        priority: i64,
        expire_at: Timestamp,
        now: Timestamp,
    ) {
        let key = key.into();

        match self.index.lookup(&key) {
            Some(id) => {
                self.entries[id].value = value;
                if self.entries[id].expire_at != expire_at {
                    self.expiry.update_expiry(&mut self.entries, id, expire_at);
                }
                self.tiers.upsert(&mut self.entries, id, priority);
            }
            None => {
                let id = self
                    .entries
                    .insert(Entry::new(key.clone(), value, priority, expire_at));
                self.index.insert(key, id);
                self.expiry.insert(&mut self.entries, id);
                self.tiers.upsert(&mut self.entries, id, priority);
            }
        }

        self.evict_items(now);
    }

    // == Set Max Items ==
    /// Changes the capacity and trims the cache to it.
    pub fn set_max_items(&mut self, max_items: i64, now: Timestamp) {
        self.max_items = max_items;
        self.evict_items(now);
    }

    // == Evict Items ==
    /// Evicts entries until the item count is within capacity.
    ///
    /// Returns the number of entries removed.
    pub fn evict_items(&mut self, now: Timestamp) -> usize {
        let mut removed = 0;

        while self.over_capacity() {
            if let Some(id) = self.expired_min(now) {
                self.discard(id, Removal::Expired);
            } else if let Some(id) = self.tiers.victim_of_lowest_tier() {
                self.discard(id, Removal::Evicted);
            } else {
                unreachable!(
                    "{} entries exceed capacity {} with no eviction candidate",
                    self.index.len(),
                    self.max_items
                );
            }
            removed += 1;
        }

        removed
    }

    // == Remove ==
    /// Deletes an entry regardless of expiry, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let id = self.index.lookup(key)?;
        Some(self.discard(id, Removal::Deleted).value)
    }

    // == Purge Expired ==
    /// Drops every entry expired at `now`, whatever the capacity.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now: Timestamp) -> usize {
        let mut removed = 0;
        while let Some(id) = self.expired_min(now) {
            self.discard(id, Removal::Expired);
            removed += 1;
        }
        removed
    }

    /// Keys currently stored, in no particular order. Entries that expired
    /// but were not yet observed are included.
    pub fn keys(&self) -> Vec<String> {
        self.index.keys().cloned().collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.lookup(key).is_some()
    }

    /// Lowest priority that currently holds entries.
    pub fn lowest_priority(&self) -> Option<i64> {
        self.tiers.lowest_tier()
    }

    /// Number of distinct priorities currently holding entries.
    pub fn tier_count(&self) -> usize {
        self.tiers.tier_count()
    }

    /// Number of entries stored under `priority`.
    pub fn tier_len(&self, priority: i64) -> usize {
        self.tiers.tier_len(priority)
    }

    pub fn max_items(&self) -> i64 {
        self.max_items
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Negative capacities count as zero.
    fn over_capacity(&self) -> bool {
        i64::try_from(self.len()).unwrap_or(i64::MAX) > self.max_items.max(0)
    }

    fn expired_min(&self, now: Timestamp) -> Option<EntryId> {
        self.expiry
            .peek_min()
            .filter(|&id| self.entries[id].is_expired(now))
    }

    /// Removes an entry from every structure at once.
    fn discard(&mut self, id: EntryId, reason: Removal) -> Entry<V> {
        let slot = self.entries[id].heap_slot;
        let from_heap = self.expiry.remove_at(&mut self.entries, slot);
        assert_eq!(from_heap, id, "expiry heap slot held another entry");
        self.tiers.remove(&mut self.entries, id);

        let entry = match self.entries.remove(id) {
            Some(entry) => entry,
            None => unreachable!("entry {:?} vanished from the arena", id),
        };
        let indexed = self.index.remove(&entry.key);
        assert_eq!(indexed, Some(id), "key index out of sync for '{}'", entry.key);

        match reason {
            Removal::Expired => {
                self.stats.record_expiration();
                debug!("Expired '{}' (expire_at={})", entry.key, entry.expire_at);
            }
            Removal::Evicted => {
                self.stats.record_eviction();
                debug!("Evicted '{}' from priority tier {}", entry.key, entry.priority);
            }
            Removal::Deleted => {}
        }

        debug_assert_eq!(self.entries.len(), self.index.len());
        debug_assert_eq!(self.expiry.len(), self.index.len());
        entry
    }

    /// Cross-checks all structures against each other.
    #[cfg(test)]
    pub(crate) fn validate(&self) {
        let live = self.index.len();
        assert_eq!(self.entries.len(), live);
        assert_eq!(self.expiry.len(), live);
        assert_eq!(self.tiers.validate(&self.entries), live);
        self.expiry.validate(&self.entries);
        for (id, entry) in self.entries.iter() {
            assert_eq!(self.index.lookup(&entry.key), Some(id));
        }
    }
}
