//! Priority Expiry Cache - an in-process cache with two-tier eviction
//!
//! Entries past their expiration time are evicted first; after that the
//! least recently used entry of the lowest priority tier goes.

pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod handle;
pub mod tasks;

pub use cache::{CacheStats, PriorityExpiryCache, Timestamp};
pub use config::Config;
pub use handle::SharedCache;
pub use tasks::spawn_expiry_sweep;
