//! Cache Module
//!
//! Provides in-memory result storage with TTL expiration and LRU eviction.

mod clock;
mod entry;
mod expiry;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use expiry::{is_expired, Expiry, TimeToLive};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Capacity used when no usable cache size is configured.
///
/// Large enough to act as "unbounded" for any practical workload.
pub const MAP_MAX_SIZE: usize = 1 << 24;

/// Maps a configured cache size to the capacity actually enforced.
///
/// Zero is not a usable size and falls back to [`MAP_MAX_SIZE`].
pub fn effective_capacity(cache_size: usize) -> usize {
    if cache_size == 0 {
        MAP_MAX_SIZE
    } else {
        cache_size
    }
}
