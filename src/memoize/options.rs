//! Memoize Options Module
//!
//! Builder for per-wrapper configuration and its validation.

use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{effective_capacity, CacheStore, Clock, SystemClock, TimeToLive, MAP_MAX_SIZE};
use crate::error::Result;
use crate::memoize::key::{first_argument, FirstArgument, KeyExtractor};

// == Memoize Options ==
/// Configuration for a memoized wrapper, fixed once the wrapper is built.
///
/// # Defaults
/// - time-to-live: infinite (entries never expire)
/// - cache size: [`MAP_MAX_SIZE`]
/// - key: the first call argument
/// - in-flight de-duplication: off
pub struct MemoizeOptions<Args, K> {
    time_to_live_ms: f64,
    cache_size: usize,
    key_extractor: KeyExtractor<Args, K>,
    dedupe_in_flight: bool,
    clock: Arc<dyn Clock>,
}

impl<Args: FirstArgument> MemoizeOptions<Args, Args::Key> {
    /// Creates options using the first-argument key policy.
    pub fn new() -> Self {
        Self::from_extractor(first_argument())
    }
}

impl<Args: FirstArgument> Default for MemoizeOptions<Args, Args::Key> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args, K> MemoizeOptions<Args, K> {
    /// Creates options with a custom key extractor.
    ///
    /// Use this for argument types that have no first-argument key.
    pub fn keyed_by<F>(key_extractor: F) -> Self
    where
        F: Fn(&Args) -> K + Send + Sync + 'static,
    {
        Self::from_extractor(Arc::new(key_extractor))
    }

    /// Creates options from a shared key extractor such as
    /// [`all_arguments`](crate::memoize::all_arguments).
    pub fn from_extractor(key_extractor: KeyExtractor<Args, K>) -> Self {
        Self {
            time_to_live_ms: f64::INFINITY,
            cache_size: MAP_MAX_SIZE,
            key_extractor,
            dedupe_in_flight: false,
            clock: Arc::new(SystemClock),
        }
    }

    /// Sets the time-to-live in milliseconds.
    ///
    /// `f64::INFINITY` keeps entries forever and `0.0` disables retention
    /// entirely. NaN and negative values are rejected when the wrapper is built.
    pub fn time_to_live_ms(mut self, ms: f64) -> Self {
        self.time_to_live_ms = ms;
        self
    }

    /// Sets the time-to-live from a [`Duration`].
    pub fn time_to_live(self, ttl: Duration) -> Self {
        self.time_to_live_ms(ttl.as_secs_f64() * 1000.0)
    }

    /// Sets the maximum number of stored results. `0` means "use the default".
    pub fn cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    /// Replaces the key extractor, possibly changing the key type.
    pub fn key_extractor<K2, F>(self, key_extractor: F) -> MemoizeOptions<Args, K2>
    where
        F: Fn(&Args) -> K2 + Send + Sync + 'static,
    {
        MemoizeOptions {
            time_to_live_ms: self.time_to_live_ms,
            cache_size: self.cache_size,
            key_extractor: Arc::new(key_extractor),
            dedupe_in_flight: self.dedupe_in_flight,
            clock: self.clock,
        }
    }

    /// Makes overlapping async calls for one key wait for the first of them
    /// instead of all running the wrapped function. Ignored by sync wrappers.
    pub fn dedupe_in_flight(mut self, enabled: bool) -> Self {
        self.dedupe_in_flight = enabled;
        self
    }

    /// Reads time from `clock` instead of the system clock.
    pub fn clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    // == Validate ==
    /// Checks the options and builds the store they describe.
    pub(crate) fn into_parts<V>(self) -> Result<Parts<Args, K, V>>
    where
        K: Hash + Eq + Clone + Debug,
    {
        let ttl = TimeToLive::from_millis(self.time_to_live_ms)?;
        let capacity = effective_capacity(self.cache_size);

        Ok(Parts {
            key_extractor: self.key_extractor,
            store: CacheStore::with_clock(capacity, ttl, self.clock),
            dedupe_in_flight: self.dedupe_in_flight,
        })
    }
}

impl<Args, K> Clone for MemoizeOptions<Args, K> {
    fn clone(&self) -> Self {
        Self {
            time_to_live_ms: self.time_to_live_ms,
            cache_size: self.cache_size,
            key_extractor: Arc::clone(&self.key_extractor),
            dedupe_in_flight: self.dedupe_in_flight,
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<Args, K> fmt::Debug for MemoizeOptions<Args, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizeOptions")
            .field("time_to_live_ms", &self.time_to_live_ms)
            .field("cache_size", &self.cache_size)
            .field("dedupe_in_flight", &self.dedupe_in_flight)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Validated pieces a wrapper is assembled from.
pub(crate) struct Parts<Args, K, V> {
    pub key_extractor: KeyExtractor<Args, K>,
    pub store: CacheStore<K, V>,
    pub dedupe_in_flight: bool,
}
