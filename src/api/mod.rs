//! API Module
//!
//! HTTP handlers and routing for the local service that fronts the clinic
//! backend.
//!
//! # Endpoints
//! - `GET /search?q=` - Grouped search across patients, professionals and anamneses
//! - `GET /dashboard` - Dashboard counters
//! - `POST /dashboard/refresh` - Reload dashboard counters, bypassing the cache
//! - `DELETE /dashboard/cache` - Drop cached dashboard counters
//! - `GET /lists/:resource` - Filtered, sorted, paginated listing
//! - `GET /cache/stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
