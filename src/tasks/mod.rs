//! Background Tasks Module
//!
//! Contains background tasks that run periodically next to the cache.
//!
//! # Tasks
//! - Expiry sweep: removes expired cache entries at configured intervals

mod cleanup;

pub use cleanup::spawn_expiry_sweep;
