//! Psyclin - client core for a psychology clinic app
//!
//! TTL caching of backend data, debounced grouped search, a REST adapter
//! that normalizes the backend's response envelopes, and a small HTTP
//! service exposing search, dashboard and listings to a thin UI.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod lists;
pub mod models;
pub mod search;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{ApiError, AppError};
pub use tasks::spawn_cleanup_task;
