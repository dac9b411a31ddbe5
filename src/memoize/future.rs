//! Asynchronous Memoization
//!
//! Wraps a function returning a fallible future. Only successful results are
//! stored.

use std::fmt::{self, Debug};
use std::future::Future;
use std::hash::Hash;
use std::sync::Mutex;

use crate::cache::{CacheStats, CacheStore, TimeToLive, MAP_MAX_SIZE};
use crate::error::Result;
use crate::memoize::in_flight::InFlightTable;
use crate::memoize::key::{first_argument, FirstArgument, KeyExtractor};
use crate::memoize::{lock_unpoisoned, CacheControl, MemoizeOptions};

// == Memoized Async ==
/// An async function together with its result cache.
///
/// The store is shared by every call made through `&self`. Overlapping calls
/// for one key each run the function and the last one to finish wins, unless
/// the wrapper was built with
/// [`dedupe_in_flight`](MemoizeOptions::dedupe_in_flight).
///
/// A call whose future is dropped before the function settles stores nothing.
pub struct MemoizedAsync<Args, K, R, F> {
    func: F,
    key_extractor: KeyExtractor<Args, K>,
    store: Mutex<CacheStore<K, R>>,
    in_flight: Option<InFlightTable<K>>,
}

impl<Args, K, R, F> MemoizedAsync<Args, K, R, F>
where
    K: Hash + Eq + Clone + Debug,
    R: Clone,
{
    // == Constructor ==
    /// Wraps `func` using `options`.
    pub fn new(func: F, options: MemoizeOptions<Args, K>) -> Result<Self> {
        let parts = options.into_parts()?;

        Ok(Self {
            func,
            key_extractor: parts.key_extractor,
            store: Mutex::new(parts.store),
            in_flight: parts.dedupe_in_flight.then(InFlightTable::default),
        })
    }

    // == Call ==
    /// Returns the stored result for these arguments, or awaits the function
    /// and stores its `Ok` value.
    ///
    /// A fresh hit resolves on first poll without running the function. An
    /// `Err` is handed back as-is and never stored, so the next call for the
    /// same key runs the function again.
    pub async fn call<Fut, E>(&self, args: Args) -> std::result::Result<R, E>
    where
        F: Fn(Args) -> Fut,
        Fut: Future<Output = std::result::Result<R, E>>,
    {
        let key = (self.key_extractor)(&args);

        let _gate = match &self.in_flight {
            Some(table) => Some(table.enter(&key).await),
            None => None,
        };

        let cached = lock_unpoisoned(&self.store).get(&key);
        if let Some(data) = cached {
            return Ok(data);
        }

        let data = (self.func)(args).await?;

        let mut store = lock_unpoisoned(&self.store);
        if store.retains_entries() {
            store.set(key, data.clone());
        }

        Ok(data)
    }
}

impl<Args, R, F> MemoizedAsync<Args, Args::Key, R, F>
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
            in_flight: None,
        }
    }
}

impl<Args, K, R, F> CacheControl for MemoizedAsync<Args, K, R, F>
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

impl<Args, K, R, F> Debug for MemoizedAsync<Args, K, R, F>
where
    K: Hash + Eq + Clone + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = lock_unpoisoned(&self.store);
        f.debug_struct("MemoizedAsync")
            .field("entries", &store.len())
            .field("capacity", &store.capacity())
            .field("dedupe_in_flight", &self.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::memoize::{memoize_async, memoize_async_with};
    use std::future::{pending, ready};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_pending, assert_ready, assert_ready_ok, block_on, task};

    #[test]
    fn test_hit_resolves_immediately() {
        let calls = AtomicUsize::new(0);
        let square = memoize_async(|n: u64| {
            calls.fetch_add(1, Ordering::SeqCst);
            ready(Ok::<_, String>(n * n))
        });

        assert_eq!(block_on(square.call(3)), Ok(9));

        let mut hit = task::spawn(square.call(3));
        assert_eq!(assert_ready_ok!(hit.poll()), 9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pending_miss_stores_nothing() {
        let never = memoize_async(|_: u8| pending::<std::result::Result<u8, ()>>());

        let mut call = task::spawn(never.call(1));
        assert_pending!(call.poll());
        assert!(never.is_empty());

        // Dropping the caller abandons the computation
        drop(call);
        assert!(never.is_empty());
    }

    #[test]
    fn test_error_is_not_cached() {
        let calls = AtomicUsize::new(0);
        let failing = memoize_async(|_: u8| {
            calls.fetch_add(1, Ordering::SeqCst);
            ready(Err::<u8, _>("boom"))
        });

        for attempt in 1..=3 {
            assert_eq!(block_on(failing.call(1)), Err("boom"));
            assert_eq!(calls.load(Ordering::SeqCst), attempt);
        }
        assert!(failing.is_empty());
    }

    #[test]
    fn test_zero_ttl_never_retains() {
        let calls = AtomicUsize::new(0);
        let echo = memoize_async_with(
            |n: u8| {
                calls.fetch_add(1, Ordering::SeqCst);
                ready(Ok::<_, ()>(n))
            },
            MemoizeOptions::new().time_to_live_ms(0.0),
        )
        .unwrap();

        block_on(echo.call(1)).unwrap();
        block_on(echo.call(1)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(echo.is_empty());
    }

    #[test]
    fn test_dedupe_waits_for_leader() {
        let calls = AtomicUsize::new(0);
        let gate = tokio::sync::Notify::new();
        let slow = memoize_async_with(
            |n: u8| {
                calls.fetch_add(1, Ordering::SeqCst);
                let gate = &gate;
                async move {
                    gate.notified().await;
                    Ok::<_, ()>(n)
                }
            },
            MemoizeOptions::new().dedupe_in_flight(true),
        )
        .unwrap();

        let mut leader = task::spawn(slow.call(7));
        let mut follower = task::spawn(slow.call(7));
        assert_pending!(leader.poll());
        assert_pending!(follower.poll());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        gate.notify_one();
        assert_eq!(assert_ready!(leader.poll()), Ok(7));
        assert_eq!(assert_ready!(follower.poll()), Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(slow.stats().hits, 1);
    }

    #[test]
    fn test_debug_reports_mode() {
        let echo = memoize_async(|n: u8| ready(Ok::<_, ()>(n)));
        assert!(format!("{:?}", echo).contains("dedupe_in_flight: false"));
    }
}
