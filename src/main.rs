//! fn_memoize demo
//!
//! Runs a short workload through a sync and an async memoized function and
//! prints the resulting cache statistics as JSON.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fn_memoize::{memoize_async_with, memoize_with, spawn_prune_task, CacheControl, Config};

/// Main entry point for the demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Wrap a slow sync function and a slow async function
/// 4. Start background prune task for the async wrapper
/// 5. Replay a workload with repeated arguments
/// 6. Print statistics and stop the prune task
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fn_memoize=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: time_to_live_ms={}, cache_size={}, prune_interval_ms={}",
        config.time_to_live_ms, config.cache_size, config.prune_interval_ms
    );

    let memoized_steps = memoize_with(collatz_steps, config.options())
        .context("invalid memoization settings for collatz_steps")?;

    let lookup = Arc::new(
        memoize_async_with(
            |name: String| async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                anyhow::ensure!(!name.is_empty(), "empty name");
                Ok(name.to_uppercase())
            },
            config.options(),
        )
        .context("invalid memoization settings for lookup")?,
    );

    let prune_handle = spawn_prune_task(lookup.clone(), config.prune_interval());

    let started = Instant::now();
    for n in [27u64, 97, 27, 871, 97, 27] {
        let steps = memoized_steps.call(n);
        info!("collatz_steps({}) = {}", n, steps);
    }

    for name in ["alpha", "beta", "alpha", "", "beta", "alpha"] {
        match lookup.call(name.to_string()).await {
            Ok(value) => info!("lookup({:?}) = {}", name, value),
            Err(err) => info!("lookup({:?}) failed: {}", name, err),
        }
    }
    info!("Workload finished in {:?}", started.elapsed());

    let (steps_stats, lookup_stats) = (memoized_steps.stats(), lookup.stats());
    info!(
        "Hit rates: collatz_steps={:.2}, lookup={:.2}",
        steps_stats.hit_rate(),
        lookup_stats.hit_rate()
    );

    let report = json!({
        "collatz_steps": steps_stats,
        "lookup": lookup_stats,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    prune_handle.abort();
    Ok(())
}

/// Deliberately slow step counter standing in for an expensive computation.
fn collatz_steps(start: u64) -> u32 {
    std::thread::sleep(Duration::from_millis(10));

    let mut n = start;
    let mut steps = 0;
    while n > 1 {
        n = if n % 2 == 0 { n / 2 } else { 3 * n + 1 };
        steps += 1;
    }
    steps
}
