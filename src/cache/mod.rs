//! Cache Module
//!
//! In-memory TTL caching for data whose staleness tolerance varies by
//! category: dashboard counters, catalogs, listings and search results.

mod clock;
mod entry;
mod lru;
mod stats;
mod store;
mod ttl;


pub use clock::{system_clock, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use lru::AccessOrder;
pub use stats::CacheStats;
pub use store::TtlCache;
pub use ttl::{CacheCategory, TTL_10_MINUTES, TTL_1_HOUR, TTL_24_HOURS, TTL_5_MINUTES};

/// A cache shared between async tasks.
pub type SharedCache<T> = std::sync::Arc<tokio::sync::RwLock<TtlCache<T>>>;

/// Wraps a cache for sharing.
pub fn shared<T>(cache: TtlCache<T>) -> SharedCache<T> {
    std::sync::Arc::new(tokio::sync::RwLock::new(cache))
}
