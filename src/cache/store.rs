//! Cache Store Module
//!
//! Result storage in recency order with expiry.

use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;

use lru::LruCache;
use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock, TimeToLive};

// == Cache Store ==
/// Bounded result storage with FIFO-by-last-touch eviction and expiry.
///
/// Every hit re-touches its key, which makes the eviction order LRU. The
/// recency list is unbounded; `capacity` is enforced here so nothing is
/// preallocated for large limits.
pub struct CacheStore<K, V> {
    /// Key-result storage, most recently touched first
    entries: LruCache<K, CacheEntry<V>>,
    /// Hit/miss/eviction counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Lifetime stamped onto each written entry
    ttl: TimeToLive,
    /// Source of "now" for stamping and expiry checks
    clock: Arc<dyn Clock>,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone + Debug,
{
    // == Constructor ==
    /// Creates a new CacheStore reading the system clock.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the store can hold
    /// * `ttl` - Lifetime applied to each entry at write time
    pub fn new(capacity: usize, ttl: TimeToLive) -> Self {
        Self::with_clock(capacity, ttl, Arc::new(SystemClock))
    }

    /// Creates a new CacheStore reading the given clock.
    pub fn with_clock(capacity: usize, ttl: TimeToLive, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: LruCache::unbounded(),
            stats: CacheStats::new(),
            capacity,
            ttl,
            clock,
        }
    }

    // == Get ==
    /// Returns a copy of the stored result for `key` if present and fresh.
    ///
    /// A hit moves the key to the most recent position. A stale entry is
    /// removed and reported as a miss.
    pub fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let now = self.clock.now_ms();
        let Some(stale) = self.entries.peek(key).map(|entry| entry.is_expired(now)) else {
            trace!(?key, "cache miss");
            self.stats.record_lookup(false);
            return None;
        };

        if stale {
            self.entries.pop(key);
            self.stats.record_expirations(1);
            self.stats.record_lookup(false);
            self.stats.set_total_entries(self.entries.len());
            debug!(?key, "dropped stale entry on read");
            return None;
        }

        let data = self.entries.get(key).map(|entry| entry.data.clone());
        self.stats.record_lookup(true);
        trace!(?key, "cache hit");
        data
    }

    // == Set ==
    /// Stores a result under `key` at the most recent position.
    ///
    /// Any previous entry for `key` is replaced. If the store then holds more
    /// than `capacity` entries, the single oldest one is evicted. Nothing is
    /// stored when the lifetime is zero.
    pub fn set(&mut self, key: K, data: V) {
        if !self.retains_entries() {
            return;
        }

        let expires_at = self.ttl.expiry_from(self.clock.now_ms());
        self.entries.put(key, CacheEntry::new(data, expires_at));

        // Insertion adds at most one entry, so one eviction restores the bound
        if self.entries.len() > self.capacity {
            if let Some((evicted, _)) = self.entries.pop_lru() {
                self.stats.record_eviction();
                debug!(key = ?evicted, capacity = self.capacity, "evicted oldest entry");
            }
        }

        self.stats.set_total_entries(self.entries.len());
    }

    // == Cleanup Expired ==
    /// Removes all stale entries; fresh entries keep their order.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let stale: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            self.entries.pop(key);
        }

        let count = stale.len();
        if count > 0 {
            self.stats.record_expirations(count);
            debug!(removed = count, "pruned stale entries");
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Clear ==
    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        debug!(dropped = self.entries.len(), "cleared store");
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> CacheStore<K, V> {
    // == Retains Entries ==
    /// False when the lifetime is zero and results are never kept.
    pub fn retains_entries(&self) -> bool {
        !self.ttl.is_zero()
    }

    // == Capacity ==
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K: Hash + Eq, V> Debug for CacheStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
