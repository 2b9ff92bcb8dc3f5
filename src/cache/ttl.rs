//! TTL Categories
//!
//! How long each kind of data may be served from cache before refetching.

use std::time::Duration;

use serde::Serialize;

pub const TTL_5_MINUTES: Duration = Duration::from_secs(5 * 60);
pub const TTL_10_MINUTES: Duration = Duration::from_secs(10 * 60);
pub const TTL_1_HOUR: Duration = Duration::from_secs(60 * 60);
pub const TTL_24_HOURS: Duration = Duration::from_secs(24 * 60 * 60);

// == Cache Category ==
/// Staleness tolerance classes for cached data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheCategory {
    /// Active counters shown on the dashboard
    Counts,
    /// Reference data such as the procedure catalog
    Catalog,
    /// Full resource listings
    Lists,
    /// Search query results
    SearchResults,
}

impl CacheCategory {
    pub const fn ttl(self) -> Duration {
        match self {
            CacheCategory::Counts => TTL_1_HOUR,
            CacheCategory::Catalog => TTL_24_HOURS,
            CacheCategory::Lists => TTL_10_MINUTES,
            CacheCategory::SearchResults => TTL_5_MINUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_lifetimes() {
        assert_eq!(CacheCategory::Counts.ttl(), Duration::from_secs(3_600));
        assert_eq!(CacheCategory::Catalog.ttl(), Duration::from_secs(86_400));
        assert_eq!(CacheCategory::SearchResults.ttl(), Duration::from_secs(300));
        assert!(CacheCategory::Lists.ttl() < CacheCategory::Counts.ttl());
    }
}
