//! Cache Store Module
//!
//! Key → (value, expiry) map with lazy expiry on read, a sweep for
//! periodic cleanup, and an optional capacity bound with LRU eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{AccessOrder, CacheCategory, CacheEntry, CacheStats, Clock};

// == TTL Cache ==
/// In-memory cache where every entry carries its own expiry.
///
/// Reads never fail: a missing or expired key is reported as `None`.
/// Expired entries are removed either when read or by [`TtlCache::cleanup`].
#[derive(Debug)]
pub struct TtlCache<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Recency order, consulted only when `max_entries` is set
    order: AccessOrder,
    /// Usage counters
    stats: CacheStats,
    /// Optional capacity bound
    max_entries: Option<usize>,
    /// Time source
    clock: Arc<dyn Clock>,
}

impl<T: Clone> TtlCache<T> {
    // == Constructors ==
    /// Creates an unbounded cache. Memory is bounded only by expiry.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            order: AccessOrder::new(),
            stats: CacheStats::new(),
            max_entries: None,
            clock,
        }
    }

    /// Creates a cache holding at most `max_entries` entries.
    ///
    /// When full, inserting a new key first sweeps expired entries and then,
    /// if still full, evicts the least recently used one.
    pub fn with_capacity(clock: Arc<dyn Clock>, max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(1)),
            ..Self::new(clock)
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`.
    ///
    /// Overwrites any existing entry unconditionally, resetting its expiry.
    pub fn set(&mut self, key: impl Into<String>, value: T, ttl: Duration) {
        let key = key.into();
        let now = self.clock.now_ms();

        if let Some(max) = self.max_entries {
            if !self.entries.contains_key(&key) && self.entries.len() >= max {
                self.sweep(now);
            }
            while !self.entries.contains_key(&key) && self.entries.len() >= max {
                match self.order.pop_least_recent() {
                    Some(evicted) => {
                        self.entries.remove(&evicted);
                        self.stats.record_eviction();
                    }
                    None => break,
                }
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, now, ttl));
        self.order.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    /// Stores `value` with the lifetime of its data category.
    pub fn set_for(&mut self, key: impl Into<String>, value: T, category: CacheCategory) {
        self.set(key, value, category.ttl());
    }

    // == Get ==
    /// Returns the value while the entry is live.
    ///
    /// An expired entry is deleted and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired_at(now),
        };

        if expired {
            self.entries.remove(key);
            self.order.forget(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            return None;
        }

        self.stats.record_hit();
        self.order.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.order.forget(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Clear ==
    /// Drops every entry. Counters other than `total_entries` are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Cleanup ==
    /// Removes every expired entry and returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.sweep(now)
    }

    fn sweep(&mut self, now: u64) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.order.forget(key);
        }

        self.stats.record_expirations(expired.len());
        self.stats.set_total_entries(self.entries.len());
        expired.len()
    }

    // == Inspection ==
    /// Whether `key` holds a live entry. Does not touch stats or recency.
    pub fn contains_key(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Remaining lifetime of a live entry.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.ttl_remaining_at(now))
    }

    /// Snapshot of the usage counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
