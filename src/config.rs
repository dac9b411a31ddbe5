//! Configuration Module
//!
//! Loads memoization settings from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::MAP_MAX_SIZE;
use crate::memoize::{FirstArgument, MemoizeOptions};

/// Memoization parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Time-to-live in milliseconds for stored results (infinite = never expire)
    pub time_to_live_ms: f64,
    /// Maximum number of stored results per wrapper
    pub cache_size: usize,
    /// Background prune task interval in milliseconds
    pub prune_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Values that fail to parse fall back to their default. Range checks on
    /// the time-to-live happen when the options reach a wrapper constructor.
    ///
    /// # Environment Variables
    /// - `MEMOIZE_TTL_MS` - Time-to-live in milliseconds (default: `inf`)
    /// - `MEMOIZE_CACHE_SIZE` - Maximum stored results (default: 16777216)
    /// - `MEMOIZE_PRUNE_INTERVAL_MS` - Prune frequency in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            time_to_live_ms: parse_var("MEMOIZE_TTL_MS").unwrap_or(defaults.time_to_live_ms),
            cache_size: parse_var("MEMOIZE_CACHE_SIZE").unwrap_or(defaults.cache_size),
            prune_interval_ms: parse_var("MEMOIZE_PRUNE_INTERVAL_MS")
                .unwrap_or(defaults.prune_interval_ms),
        }
    }

    /// Builds wrapper options keyed on the first call argument.
    pub fn options<Args: FirstArgument>(&self) -> MemoizeOptions<Args, Args::Key> {
        MemoizeOptions::new()
            .time_to_live_ms(self.time_to_live_ms)
            .cache_size(self.cache_size)
    }

    /// Interval between background prune runs.
    pub fn prune_interval(&self) -> Duration {
        Duration::from_millis(self.prune_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_to_live_ms: f64::INFINITY,
            cache_size: MAP_MAX_SIZE,
            prune_interval_ms: 1000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
