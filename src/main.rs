//! TTL Storage stress driver
//!
//! Runs a concurrent workload against one shared storage and exits with an
//! error if any update was lost.

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_storage::{stress, Storage, StressConfig};

/// Main entry point for the stress driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Run the workload against a fresh storage
/// 4. Report and fail on lost updates
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_storage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StressConfig::from_env();
    info!(
        "Configuration loaded: workers={}, keys_per_worker={}, ttl={}ms, prefix={:?}",
        config.workers, config.keys_per_worker, config.ttl_ms, config.key_prefix
    );

    let storage = Storage::new();
    let report = stress::run(&storage, &config).context("stress run failed")?;

    info!(
        "{} operations in {:?} ({:.0} ops/s), {} of {} keys survived",
        report.operations,
        report.elapsed,
        report.throughput(),
        report.remaining,
        report.expected_remaining
    );

    if !report.is_clean() {
        bail!(
            "lost updates detected: {} misses, {} mismatches, {} panicked workers",
            report.misses,
            report.mismatches,
            report.panicked_workers
        );
    }

    Ok(())
}
