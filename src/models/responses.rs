//! Response DTOs
//!
//! Bodies written by the local HTTP service. Search results, dashboard
//! snapshots and list pages serialize their own domain types directly.

use serde::Serialize;

use crate::cache::CacheStats;

/// Usage counters of one cache, with its hit rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatsEntry {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsEntry {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for `GET /cache/stats`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatsResponse {
    pub search: CacheStatsEntry,
    pub dashboard: CacheStatsEntry,
    pub lists: CacheStatsEntry,
}

/// Response body for `DELETE /dashboard/cache`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
    /// Entries dropped
    pub cleared: usize,
}

impl InvalidateResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            message: format!("Cleared {cleared} dashboard entries"),
            cleared,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
