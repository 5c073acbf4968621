//! Stress Driver
//!
//! Hammers a shared storage from many threads on disjoint key ranges and
//! checks that no update was lost.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::StressConfig;
use crate::error::Result;
use crate::storage::{saturating_millis, Storage};

// == Stress Report ==
/// Outcome of one stress run.
#[derive(Debug, Clone, Default)]
pub struct StressReport {
    /// Total Set, Get and Rem calls issued by all workers
    pub operations: u64,
    /// Reads that found nothing where a value had just been written
    pub misses: u64,
    /// Reads or removals that returned someone else's value
    pub mismatches: u64,
    /// Workers that panicked instead of finishing
    pub panicked_workers: usize,
    /// Keys the workers expected to survive their removals
    pub expected_remaining: usize,
    /// Keys Keys() found in the namespace before flushing it
    pub remaining: usize,
    /// Whether entries were written with a TTL
    pub expiring: bool,
    /// Wall-clock duration of the worker phase
    pub elapsed: Duration,
}

impl StressReport {
    /// Returns true if the run saw no lost or foreign updates.
    ///
    /// Expiring runs may legitimately miss reads and lose keys to their TTL,
    /// so only mismatches and panicked workers count against them.
    pub fn is_clean(&self) -> bool {
        if self.mismatches > 0 || self.panicked_workers > 0 {
            return false;
        }
        self.expiring || (self.misses == 0 && self.remaining == self.expected_remaining)
    }

    /// Operations per second over the worker phase.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.operations as f64 / secs
        }
    }
}

/// Per-worker counters, merged into the report once the worker finishes.
#[derive(Debug, Default)]
struct WorkerTally {
    operations: u64,
    misses: u64,
    mismatches: u64,
    kept: usize,
}

// == Run ==
/// Runs the configured workload against `storage`.
///
/// Each worker owns a disjoint key range. It writes every key, reads each
/// one back, then removes the odd-indexed ones. The namespace is enumerated
/// with `keys` and cleared with `flush` once all workers are done.
///
/// # Errors
/// Propagates a rejected namespace pattern from `Storage::keys`.
pub fn run(storage: &Storage<u64>, config: &StressConfig) -> Result<StressReport> {
    let ttl = config.ttl();
    info!(
        workers = config.workers,
        keys_per_worker = config.keys_per_worker,
        ttl_ms = config.ttl_ms,
        "Starting stress run"
    );

    let started = Instant::now();
    let tallies: Vec<Option<WorkerTally>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..config.workers)
            .map(|worker| scope.spawn(move || run_worker(storage, config, worker, ttl)))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().ok())
            .collect()
    });
    let elapsed = started.elapsed();

    let mut report = StressReport {
        expiring: !ttl.is_zero(),
        elapsed,
        ..StressReport::default()
    };
    for tally in tallies {
        let Some(tally) = tally else {
            report.panicked_workers += 1;
            continue;
        };
        report.operations += tally.operations;
        report.misses += tally.misses;
        report.mismatches += tally.mismatches;
        report.expected_remaining += tally.kept;
    }

    let pattern = format!("{}.*", regex::escape(&config.key_prefix));
    report.remaining = storage.keys(&pattern)?.len();
    storage.flush(&config.key_prefix);

    if report.is_clean() {
        info!(
            operations = report.operations,
            remaining = report.remaining,
            elapsed_ms = saturating_millis(report.elapsed),
            "Stress run finished"
        );
    } else {
        warn!(
            misses = report.misses,
            mismatches = report.mismatches,
            panicked_workers = report.panicked_workers,
            remaining = report.remaining,
            expected_remaining = report.expected_remaining,
            "Stress run detected lost updates"
        );
    }

    Ok(report)
}

fn run_worker(
    storage: &Storage<u64>,
    config: &StressConfig,
    worker: usize,
    ttl: Duration,
) -> WorkerTally {
    let mut tally = WorkerTally::default();
    let key = |index: usize| format!("{}{}:{}", config.key_prefix, worker, index);
    let value = |index: usize| (worker * config.keys_per_worker + index) as u64;

    for index in 0..config.keys_per_worker {
        storage.set(key(index), value(index), ttl);
        tally.operations += 1;
    }

    for index in 0..config.keys_per_worker {
        match storage.get(&key(index)) {
            Some(found) if found == value(index) => {}
            Some(_) => tally.mismatches += 1,
            None => tally.misses += 1,
        }
        tally.operations += 1;
    }

    for index in (1..config.keys_per_worker).step_by(2) {
        match storage.rem(&key(index)) {
            Some(found) if found != value(index) => tally.mismatches += 1,
            _ => {}
        }
        tally.operations += 1;
    }

    tally.kept = config.keys_per_worker.div_ceil(2);
    debug!(worker, ?tally, "Worker finished");
    tally
}
