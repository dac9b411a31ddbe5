//! Synchronous Memoization
//!
//! Wraps a plain function; compute-or-serve happens immediately.

use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Mutex;

use crate::cache::{CacheStats, CacheStore, TimeToLive, MAP_MAX_SIZE};
use crate::error::Result;
use crate::memoize::key::{first_argument, FirstArgument, KeyExtractor};
use crate::memoize::{lock_unpoisoned, CacheControl, MemoizeOptions};

// == Memoized ==
/// A synchronous function together with its result cache.
///
/// Results are returned by clone. The store lock is released while the wrapped
/// function runs, so a panic inside it stores nothing and leaves the cache
/// usable.
pub struct Memoized<Args, K, R, F> {
    func: F,
    key_extractor: KeyExtractor<Args, K>,
    store: Mutex<CacheStore<K, R>>,
}

impl<Args, K, R, F> Memoized<Args, K, R, F>
where
    F: Fn(Args) -> R,
    K: Hash + Eq + Clone + Debug,
    R: Clone,
{
    // == Constructor ==
    /// Wraps `func` using `options`.
    ///
    /// Fails with [`MemoizeError`](crate::MemoizeError) when the options are
    /// unusable; nothing is wrapped in that case.
    pub fn new(func: F, options: MemoizeOptions<Args, K>) -> Result<Self> {
        let parts = options.into_parts()?;

        Ok(Self {
            func,
            key_extractor: parts.key_extractor,
            store: Mutex::new(parts.store),
        })
    }

    // == Call ==
    /// Returns the stored result for these arguments, or runs the function
    /// and stores what it returns.
    pub fn call(&self, args: Args) -> R {
        let key = (self.key_extractor)(&args);

        let cached = lock_unpoisoned(&self.store).get(&key);
        if let Some(data) = cached {
            return data;
        }

        let data = (self.func)(args);

        let mut store = lock_unpoisoned(&self.store);
        if store.retains_entries() {
            store.set(key, data.clone());
        }

        data
    }
}

impl<Args, R, F> Memoized<Args, Args::Key, R, F>
where
    Args: FirstArgument,
{
    /// Wraps `func` with default options: no expiry, [`MAP_MAX_SIZE`] entries,
    /// first-argument keys.
    pub(crate) fn from_defaults(func: F) -> Self {
        Self {
            func,
            key_extractor: first_argument(),
            store: Mutex::new(CacheStore::new(MAP_MAX_SIZE, TimeToLive::Forever)),
        }
    }
}

impl<Args, K, R, F> CacheControl for Memoized<Args, K, R, F>
where
    K: Hash + Eq + Clone + Debug,
{
    fn clear_cache(&self) {
        lock_unpoisoned(&self.store).clear();
    }

    fn delete_expired_cache(&self) {
        lock_unpoisoned(&self.store).cleanup_expired();
    }

    fn stats(&self) -> CacheStats {
        lock_unpoisoned(&self.store).stats()
    }

    fn len(&self) -> usize {
        lock_unpoisoned(&self.store).len()
    }
}

impl<Args, K, R, F> Debug for Memoized<Args, K, R, F>
where
    K: Hash + Eq + Clone + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = lock_unpoisoned(&self.store);
        f.debug_struct("Memoized")
            .field("entries", &store.len())
            .field("capacity", &store.capacity())
            .finish_non_exhaustive()
    }
}
