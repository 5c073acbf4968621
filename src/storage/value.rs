//! Type-Erased Values
//!
//! Lets a single storage hold values of unrelated types and recover them
//! with a checked downcast.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, StorageError};

// == Any Value ==
/// A shared, type-erased value.
///
/// Cloning is cheap: all clones point at the same allocation.
#[derive(Clone)]
pub struct AnyValue(Arc<dyn Any + Send + Sync>);

impl AnyValue {
    /// Wraps a value of any thread-safe type.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns true if the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    /// Borrows the wrapped value as a `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Recovers the shared `T`, or reports which type was expected.
    pub fn downcast<T: Any + Send + Sync>(self) -> Result<Arc<T>> {
        self.0.downcast::<T>().map_err(|_| StorageError::TypeMismatch {
            expected: type_name::<T>(),
        })
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyValue").finish_non_exhaustive()
    }
}
