//! Configuration Module
//!
//! Handles loading the stress driver's configuration from environment variables.

use std::env;
use std::time::Duration;

/// Stress run parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of worker threads hitting the storage concurrently
    pub workers: usize,
    /// Number of distinct keys each worker writes
    pub keys_per_worker: usize,
    /// TTL in milliseconds for written entries, 0 = never expire
    pub ttl_ms: u64,
    /// Namespace every stress key lives under; flushed at the end of a run
    pub key_prefix: String,
}

impl StressConfig {
    /// Creates a new StressConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STRESS_WORKERS` - Worker threads (default: 8)
    /// - `STRESS_KEYS_PER_WORKER` - Keys written per worker (default: 1000)
    /// - `STRESS_TTL_MS` - Entry TTL in milliseconds (default: 0, never expire)
    /// - `STRESS_KEY_PREFIX` - Key namespace (default: "stress:")
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            workers: env::var("STRESS_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.workers),
            keys_per_worker: env::var("STRESS_KEYS_PER_WORKER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.keys_per_worker),
            ttl_ms: env::var("STRESS_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ttl_ms),
            key_prefix: env::var("STRESS_KEY_PREFIX").unwrap_or(defaults.key_prefix),
        }
    }

    /// TTL applied to every key written during the run.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            keys_per_worker: 1000,
            ttl_ms: 0,
            key_prefix: "stress:".to_string(),
        }
    }
}
