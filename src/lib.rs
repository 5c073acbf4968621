//! TTL Storage - A thread-safe in-process key/value cache
//!
//! Provides typed storage with lazy TTL expiration, prefix flushing and
//! regex-based key enumeration.

pub mod config;
pub mod error;
pub mod storage;
pub mod stress;

pub use config::StressConfig;
pub use error::{Result, StorageError};
pub use storage::{AnyStorage, AnyValue, Storage};
