//! Cache Statistics Module
//!
//! Counters describing how a cache has been used.

use serde::Serialize;

// == Cache Stats ==
/// Usage counters for a [`TtlCache`](super::TtlCache).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads that returned a live value
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Entries dropped to respect the capacity bound
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed (on read or sweep)
    pub expirations: u64,
    /// Entries currently stored, live or not yet swept
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// hits / (hits + misses), or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_expirations_accumulates() {
        let mut stats = CacheStats::new();
        stats.record_expirations(2);
        stats.record_expirations(3);
        assert_eq!(stats.expirations, 5);
    }
}
