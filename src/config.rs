//! Configuration Module
//!
//! Loads cache settings from environment variables.

use std::env;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold; zero or less disables caching
    pub max_items: i64,
    /// Expiry sweep interval in seconds, 0 = lazy expiry only
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ITEMS` - Maximum cache entries (default: 1000)
    /// - `SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: 0, disabled)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_items: env::var("MAX_ITEMS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_items),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval),
        }
    }

    /// Whether the background expiry sweep should run.
    pub fn sweep_enabled(&self) -> bool {
        self.sweep_interval > 0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items: 1000,
            sweep_interval: 0,
        }
    }
}
