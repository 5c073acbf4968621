//! Storage Module
//!
//! Thread-safe key/value map with lazy TTL expiration, prefix flushing and
//! pattern-based key enumeration.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use regex::Regex;
use regex_syntax::hir::{Hir, Look};
use tracing::{debug, trace};

use crate::error::Result;
use crate::storage::{saturating_millis, AnyValue, Item};

// == Storage ==
/// In-memory storage guarded by a single reader/writer lock.
///
/// Expired items are never swept in the background. `get` purges an expired
/// item when it finds one; every other operation sees it as stored.
#[derive(Debug)]
pub struct Storage<V> {
    items: RwLock<HashMap<String, Item<V>>>,
}

/// Storage holding values of mixed types.
pub type AnyStorage = Storage<AnyValue>;

impl<V> Storage<V> {
    // == Constructor ==
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired items are treated as missing and removed.
    ///
    /// # Arguments
    /// * `key` - The key to retrieve
    ///
    /// # Returns
    /// - `Some(value)` if the key is stored and not expired
    /// - `None` if the key is missing or has expired
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        {
            let items = self.items.read();
            match items.get(key) {
                None => return None,
                Some(item) if !item.expired() => return Some(item.content.clone()),
                Some(_) => {}
            }
        }

        self.purge_expired(key)
    }

    /// Removes `key` under the write lock if it is still expired.
    ///
    /// The item may have been replaced between dropping the read lock and
    /// taking the write lock; a replacement that has not expired is returned
    /// instead of being removed.
    fn purge_expired(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let mut items = self.items.write();
        if !items.get(key)?.expired() {
            return items.get(key).map(|item| item.content.clone());
        }

        items.remove(key);
        debug!(key, "Purged expired item");
        None
    }

    // == Expiration ==
    /// Returns the stored expiration of `key`.
    ///
    /// None when the key is missing or never expires. Already-expired items
    /// are reported as they are, not purged.
    pub fn expiration(&self, key: &str) -> Option<DateTime<Utc>> {
        self.items.read().get(key).and_then(|item| item.expiration)
    }

    // == Time To Live ==
    /// Returns the time left before `key` expires.
    ///
    /// Negative once the item has expired; zero when the key is missing or
    /// never expires.
    pub fn ttl(&self, key: &str) -> TimeDelta {
        self.items
            .read()
            .get(key)
            .map(Item::ttl)
            .unwrap_or_else(TimeDelta::zero)
    }

    // == Keys ==
    /// Returns every key that matches `pattern` as a whole.
    ///
    /// The pattern is anchored at both ends, so `[0-9]+` matches `"0123"`
    /// but not `"a0123"`. Expired items that have not been read yet are
    /// still listed. Order is unspecified.
    ///
    /// # Errors
    /// `StorageError::InvalidPattern` if `pattern` does not compile.
    pub fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let matcher = full_match(pattern).map_err(|err| {
            debug!(pattern, error = %err, "Rejected key pattern");
            err
        })?;

        let items = self.items.read();
        Ok(items
            .keys()
            .filter(|key| matcher.is_match(key))
            .cloned()
            .collect())
    }

    // == Set ==
    /// Stores a value, replacing any existing item and its expiration.
    ///
    /// # Arguments
    /// * `key` - The key to store under
    /// * `value` - The value to store
    /// * `ttl` - Time until the item expires, `Duration::ZERO` = never
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let item = Item::new(value, ttl);
        trace!(
            key = %key,
            ttl_ms = saturating_millis(ttl),
            "Set item"
        );

        self.items.write().insert(key, item);
    }

    // == Flush ==
    /// Removes every item whose key starts with a prefix.
    ///
    /// This is a literal prefix test, not a pattern.
    ///
    /// # Arguments
    /// * `prefix` - Key prefix to remove, `""` clears the storage
    pub fn flush(&self, prefix: &str) {
        let mut items = self.items.write();
        let before = items.len();
        items.retain(|key, _| !key.starts_with(prefix));

        let removed = before - items.len();
        if removed > 0 {
            debug!(prefix, removed, "Flushed items");
        }
    }

    // == Remove ==
    /// Removes an item by key without checking its expiration.
    ///
    /// # Returns
    /// - `Some(value)` with the removed value, even if it had expired
    /// - `None` if the key was not stored
    pub fn rem(&self, key: &str) -> Option<V> {
        self.items.write().remove(key).map(|item| item.content)
    }

    // == Length ==
    /// Returns the number of stored items, expired ones included.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    // == Is Empty ==
    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl<V> Default for Storage<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage<AnyValue> {
    /// Reads `key` back as a `T`.
    ///
    /// `Ok(None)` when the key is missing or expired.
    ///
    /// # Errors
    /// `StorageError::TypeMismatch` if the stored value is not a `T`.
    pub fn get_as<T: Any + Send + Sync>(&self, key: &str) -> Result<Option<Arc<T>>> {
        self.get(key).map(AnyValue::downcast::<T>).transpose()
    }
}

/// Compiles `pattern` so that it only matches complete keys.
///
/// The anchors are added to the parsed pattern rather than to its text, so
/// flags such as `(?x)` and unbalanced-looking alternations cannot leak out
/// of the anchored group.
fn full_match(pattern: &str) -> Result<Regex> {
    let hir = regex_syntax::parse(pattern)
        .map_err(|err| regex::Error::Syntax(err.to_string()))?;
    let anchored = Hir::concat(vec![Hir::look(Look::Start), hir, Hir::look(Look::End)]);

    Ok(Regex::new(&anchored.to_string())?)
}
