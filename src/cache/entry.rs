//! Cache Entry Module
//!
//! A single stored value together with its creation and expiry instants.

use std::time::Duration;

// == Cache Entry ==
/// A cached value with millisecond timestamps.
///
/// `expires_at` is always strictly greater than `created_at`: a zero TTL is
/// clamped to one millisecond.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry stored at `now_ms` that lives for `ttl`.
    pub fn new(value: T, now_ms: u64, ttl: Duration) -> Self {
        let ttl_ms = (ttl.as_millis() as u64).max(1);

        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at `now_ms`.
    ///
    /// The entry is expired as soon as the full TTL has elapsed, i.e. when
    /// `now_ms >= expires_at`.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime at `now_ms`, zero once expired.
    pub fn ttl_remaining_at(&self, now_ms: u64) -> Duration {
        Duration::from_millis(self.expires_at.saturating_sub(now_ms))
    }
}
