//! Memoize Module
//!
//! Sync and async function wrappers that serve repeated calls from a
//! bounded, expiring result cache.

mod future;
mod in_flight;
mod key;
mod options;
mod sync;

use std::fmt::Debug;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use future::MemoizedAsync;
pub use key::{all_arguments, first_argument, FirstArgument, KeyExtractor};
pub use options::MemoizeOptions;
pub use sync::Memoized;

use crate::cache::CacheStats;
use crate::error::Result;

// == Cache Control ==
/// Management operations every memoized wrapper exposes next to `call`.
pub trait CacheControl {
    /// Drops every stored result.
    fn clear_cache(&self);

    /// Drops only the results that have gone stale. Fresh results keep their
    /// eviction order.
    fn delete_expired_cache(&self);

    /// Returns hit/miss/eviction counters and the current entry count.
    fn stats(&self) -> CacheStats;

    /// Returns the number of stored results.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == Constructors ==
/// Memoizes a synchronous function with default options.
///
/// Results never expire, the cache is effectively unbounded, and calls are
/// keyed on their first argument.
pub fn memoize<Args, R, F>(func: F) -> Memoized<Args, Args::Key, R, F>
where
    Args: FirstArgument,
    F: Fn(Args) -> R,
    R: Clone,
{
    Memoized::from_defaults(func)
}

/// Memoizes a synchronous function with the given options.
pub fn memoize_with<Args, K, R, F>(
    func: F,
    options: MemoizeOptions<Args, K>,
) -> Result<Memoized<Args, K, R, F>>
where
    F: Fn(Args) -> R,
    K: std::hash::Hash + Eq + Clone + Debug,
    R: Clone,
{
    Memoized::new(func, options)
}

/// Memoizes an async function with default options.
pub fn memoize_async<Args, R, E, F, Fut>(func: F) -> MemoizedAsync<Args, Args::Key, R, F>
where
    Args: FirstArgument,
    F: Fn(Args) -> Fut,
    Fut: Future<Output = std::result::Result<R, E>>,
    R: Clone,
{
    MemoizedAsync::from_defaults(func)
}

/// Memoizes an async function with the given options.
pub fn memoize_async_with<Args, K, R, E, F, Fut>(
    func: F,
    options: MemoizeOptions<Args, K>,
) -> Result<MemoizedAsync<Args, K, R, F>>
where
    F: Fn(Args) -> Fut,
    Fut: Future<Output = std::result::Result<R, E>>,
    K: std::hash::Hash + Eq + Clone + Debug,
    R: Clone,
{
    MemoizedAsync::new(func, options)
}

/// Locks a mutex, recovering the data if a previous holder panicked.
///
/// No store mutation can be left half-done by a panic, since wrapped
/// functions never run under the lock.
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
