//! Cache Entry Module
//!
//! Defines the structure for individual memoized results with expiry.

use crate::cache::Expiry;

// == Cache Entry ==
/// A stored result together with its absolute expiry.
///
/// Entries are never mutated; a refresh replaces the whole entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The stored result
    pub data: V,
    /// When the result goes stale
    pub expires_at: Expiry,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry.
    pub fn new(data: V, expires_at: Expiry) -> Self {
        Self { data, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry is stale at `now_ms`.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at.is_expired(now_ms)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_never_expires() {
        let entry = CacheEntry::new("value", Expiry::Never);

        assert_eq!(entry.data, "value");
        assert!(!entry.is_expired(u64::MAX));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(7, Expiry::At(2_000));

        assert!(!entry.is_expired(1_999));
        assert!(entry.is_expired(2_000));
    }
}
