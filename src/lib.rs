//! fn_memoize - Function-result memoization
//!
//! Wraps sync and async functions so repeated calls are served from a result
//! cache with TTL expiration and LRU eviction.

pub mod cache;
pub mod config;
pub mod error;
pub mod memoize;
pub mod tasks;

pub use config::Config;
pub use error::{MemoizeError, Result};
pub use memoize::{
    memoize, memoize_async, memoize_async_with, memoize_with, CacheControl, Memoized,
    MemoizedAsync, MemoizeOptions,
};
pub use tasks::spawn_prune_task;
