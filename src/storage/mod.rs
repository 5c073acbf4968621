//! Storage Module
//!
//! Provides the in-memory key/value storage with lazy TTL expiration.

mod item;
mod store;
mod value;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use item::Item;
pub(crate) use item::saturating_millis;
pub use store::{AnyStorage, Storage};
pub use value::AnyValue;
