//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside memoized wrappers.
//!
//! # Tasks
//! - Prune: Removes stale results at configured intervals

mod prune;

pub use prune::spawn_prune_task;
