//! Storage Item Module
//!
//! Defines a single stored value together with its optional expiration.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

// == Item ==
/// A stored value and the instant it stops being visible.
#[derive(Debug, Clone)]
pub struct Item<V> {
    /// The stored value, never inspected by the storage
    pub content: V,
    /// Absolute expiration time, None = never expires
    pub expiration: Option<DateTime<Utc>>,
}

impl<V> Item<V> {
    // == Constructor ==
    /// Creates an item that expires `ttl` from now.
    ///
    /// Durations too large to be represented saturate at the latest
    /// representable timestamp.
    ///
    /// # Arguments
    /// * `content` - The value to store
    /// * `ttl` - Time until expiration, `Duration::ZERO` = never expires
    pub fn new(content: V, ttl: Duration) -> Self {
        Self {
            content,
            expiration: deadline(Utc::now(), ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the item has expired.
    ///
    /// An item is expired only once the current time is strictly after its
    /// expiration; items without an expiration never expire.
    pub fn expired(&self) -> bool {
        self.expired_at(Utc::now())
    }

    /// Checks expiration against a caller-supplied clock reading.
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiration {
            Some(expiration) => now > expiration,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the time left until expiration.
    ///
    /// # Returns
    /// - A positive delta while the item is live
    /// - A negative delta once the item has expired
    /// - Zero if the item never expires
    pub fn ttl(&self) -> TimeDelta {
        self.expiration
            .map(|expiration| expiration - Utc::now())
            .unwrap_or_else(TimeDelta::zero)
    }
}

/// Computes the absolute expiration for a TTL measured from `now`.
fn deadline(now: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
    if ttl.is_zero() {
        return None;
    }

    let delta = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
    Some(
        now.checked_add_signed(delta)
            .unwrap_or(DateTime::<Utc>::MAX_UTC),
    )
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub(crate) fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
