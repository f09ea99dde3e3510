//! Cache Entry Module
//!
//! Defines a single cache slot together with the positional back-references
//! the expiry heap and the tier lists keep in it.

use chrono::Utc;

use crate::cache::arena::EntryId;

/// Absolute point in time, in Unix milliseconds.
pub type Timestamp = u64;

// == Cache Entry ==
/// Represents a single live cache entry.
///
/// The entry is owned by the arena; the key index, expiry heap and tier list
/// only refer to it through its [`EntryId`].
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// Key, immutable after creation
    pub key: String,
    /// The stored value
    pub value: V,
    /// Priority tier the entry currently lives in
    pub priority: i64,
    /// Absolute expiration time (Unix milliseconds)
    pub expire_at: Timestamp,
    /// Index of this entry in the expiry heap array
    pub(crate) heap_slot: usize,
    /// Tier whose list currently links this entry, `None` while detached
    pub(crate) tier: Option<i64>,
    /// Neighbour towards the most recently used end of the tier list
    pub(crate) prev: Option<EntryId>,
    /// Neighbour towards the least recently used end of the tier list
    pub(crate) next: Option<EntryId>,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Creates a detached entry. It is linked into the heap and tier list by
    /// the store right after insertion into the arena.
    pub fn new(key: String, value: V, priority: i64, expire_at: Timestamp) -> Self {
        Self {
            key,
            value,
            priority,
            expire_at,
            heap_slot: usize::MAX,
            tier: None,
            prev: None,
            next: None,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry whose expiration time equals `now` is already expired.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expire_at <= now
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// Clamps to zero for clocks set before the epoch.
pub fn current_timestamp_ms() -> Timestamp {
    Utc::now().timestamp_millis().max(0) as Timestamp
}
