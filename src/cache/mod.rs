//! Cache Module
//!
//! In-process cache that evicts expired entries first, then the least
//! recently used entry of the lowest priority tier.

mod arena;
mod entry;
mod expiry_heap;
mod index;
mod lru;
mod stats;
mod store;
mod tiers;


// Re-export public types
pub use entry::{current_timestamp_ms, Timestamp};
pub use stats::CacheStats;
pub use store::PriorityExpiryCache;
