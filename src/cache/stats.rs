//! Cache Statistics Module
//!
//! Counters describing how a memoized wrapper's store has been used.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of a store's counters.
///
/// Counters survive `clear_cache`; only `total_entries` drops.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Calls served from a stored result
    pub hits: u64,
    /// Calls that had to run the wrapped function
    pub misses: u64,
    /// Entries pushed out because the store was over capacity
    pub evictions: u64,
    /// Entries dropped because they went stale, on read or by pruning
    pub expirations: u64,
    /// Entries currently stored
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Share of lookups served from the store, or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    // == Recorders ==
    pub fn record_lookup(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_at_zero() {
        assert_eq!(
            CacheStats::new(),
            CacheStats {
                hits: 0,
                misses: 0,
                evictions: 0,
                expirations: 0,
                total_entries: 0,
            }
        );
    }

    #[test]
    fn test_hit_rate() {
        let mut stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);

        stats.record_lookup(false);
        assert_eq!(stats.hit_rate(), 0.0);

        stats.record_lookup(true);
        assert_eq!(stats.hit_rate(), 0.5);

        stats.record_lookup(true);
        stats.record_lookup(true);
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_eviction_and_expiration_counters() {
        let mut stats = CacheStats::new();
        stats.record_eviction();
        stats.record_eviction();
        stats.record_expirations(3);

        assert_eq!(stats.evictions, 2);
        assert_eq!(stats.expirations, 3);
    }

    #[test]
    fn test_serializes_all_counters() {
        let mut stats = CacheStats::new();
        stats.record_lookup(true);
        stats.set_total_entries(4);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["misses"], 0);
        assert_eq!(json["expirations"], 0);
        assert_eq!(json["total_entries"], 4);
    }
}
