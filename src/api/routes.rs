//! API Routes
//!
//! Configures the Axum router with every endpoint.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, dashboard_handler, health_handler, invalidate_dashboard_handler,
    list_handler, refresh_dashboard_handler, search_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin, for the browser UI served elsewhere
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", get(search_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/dashboard/refresh", post(refresh_dashboard_handler))
        .route("/dashboard/cache", delete(invalidate_dashboard_handler))
        .route("/lists/:resource", get(list_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
