//! Error types for the storage
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Storage Error Enum ==
/// Unified error type for storage operations.
///
/// A missing or expired key is not an error; lookups report it as `None`.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The pattern given to `Storage::keys` is not a valid regular expression
    #[error("Invalid key pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A type-erased value was read back as a type it does not hold
    #[error("Type mismatch: stored value is not a {expected}")]
    TypeMismatch {
        /// Name of the type the caller asked for
        expected: &'static str,
    },
}

// == Result Type Alias ==
/// Convenience Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
