//! Data models
//!
//! `Record` is the backend's JSON object. The request and response DTOs
//! are what the local HTTP service reads and writes.

pub mod record;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use record::Record;
pub use requests::{ListQuery, SearchQuery};
pub use responses::{
    CacheStatsEntry, CacheStatsResponse, ErrorResponse, HealthResponse, InvalidateResponse,
};
