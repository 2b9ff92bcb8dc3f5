//! API Handlers
//!
//! HTTP request handlers for each endpoint of the local service.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::cache::{shared, system_clock, Clock, TtlCache};
use crate::client::RestClient;
use crate::config::Config;
use crate::dashboard::{DashboardService, DashboardSnapshot};
use crate::error::{ApiResult, AppError, Result};
use crate::filter::ListPage;
use crate::lists::ListService;
use crate::models::{
    CacheStatsResponse, HealthResponse, InvalidateResponse, ListQuery, SearchQuery,
};
use crate::search::{RecordSource, ResourceSource, SearchEngine, SearchOutcome, SlotLimits};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub dashboard: DashboardService,
    pub lists: ListService,
}

impl AppState {
    pub fn new(engine: Arc<SearchEngine>, dashboard: DashboardService, lists: ListService) -> Self {
        Self {
            engine,
            dashboard,
            lists,
        }
    }

    /// Builds the backend client and every cache from configuration.
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        Self::with_clock(config, system_clock())
    }

    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> ApiResult<Self> {
        let client = RestClient::new(config.client_config())?;

        let sources = ResourceSource::all(&client)
            .into_iter()
            .map(|source| Arc::new(source) as Arc<dyn RecordSource>)
            .collect();

        let engine = SearchEngine::new(
            sources,
            shared(new_cache(config, clock.clone())),
            SlotLimits::default(),
        );
        let dashboard = DashboardService::new(client.clone(), shared(new_cache(config, clock.clone())));
        let lists = ListService::new(client, shared(new_cache(config, clock)));

        Ok(Self::new(Arc::new(engine), dashboard, lists))
    }
}

fn new_cache<T: Clone>(config: &Config, clock: Arc<dyn Clock>) -> TtlCache<T> {
    match config.cache_max_entries {
        Some(max) => TtlCache::with_capacity(clock, max),
        None => TtlCache::new(clock),
    }
}

/// Handler for GET /search?q=
///
/// Grouped matches across patients, professionals and anamneses. Sources
/// that failed are listed in `failed`; the request only fails when all did.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchOutcome>> {
    if let Some(error_msg) = query.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let outcome = state.engine.search(&query.q).await?;
    Ok(Json(outcome))
}

/// Handler for GET /dashboard
///
/// Never fails: unavailable counters fall back to zero and show up in
/// `warnings`.
pub async fn dashboard_handler(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.snapshot().await)
}

/// Handler for POST /dashboard/refresh
///
/// Drops every cached counter and answers with freshly loaded ones.
pub async fn refresh_dashboard_handler(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.refresh().await)
}

/// Handler for DELETE /dashboard/cache
pub async fn invalidate_dashboard_handler(
    State(state): State<AppState>,
) -> Json<InvalidateResponse> {
    let dashboard_cache = state.dashboard.cache();
    let mut cache = dashboard_cache.write().await;
    let cleared = cache.len();
    cache.clear();

    info!(cleared, "Dashboard cache invalidated");
    Json(InvalidateResponse::new(cleared))
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let search = state.engine.cache().read().await.stats();
    let dashboard = state.dashboard.cache().read().await.stats();
    let lists = state.lists.cache().read().await.stats();

    Json(CacheStatsResponse {
        search: search.into(),
        dashboard: dashboard.into(),
        lists: lists.into(),
    })
}

/// Handler for GET /lists/:resource
///
/// Filtered, sorted page of a backend list.
pub async fn list_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListPage>> {
    let filter = query.to_filter().map_err(AppError::InvalidRequest)?;
    let page = state.lists.page(&resource, &filter).await?;
    Ok(Json(page))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
