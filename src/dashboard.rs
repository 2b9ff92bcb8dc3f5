//! Dashboard counters
//!
//! Read-through cache over the backend counters shown on the dashboard.
//! Counters are cached for an hour, catalogs for a day. A failed fetch is
//! logged and shown as zero or empty, and is never cached.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheCategory, SharedCache};
use crate::client::RestClient;
use crate::error::ApiResult;
use crate::models::Record;

// == Cache Keys ==
pub const ACTIVE_PATIENTS_KEY: &str = "patients_count";
pub const ACTIVE_PROFESSIONALS_KEY: &str = "professionals_count";
pub const TOTAL_ANAMNESES_KEY: &str = "anamneses_count";
pub const PROCEDURES_KEY: &str = "procedures";

/// A value held in the dashboard cache.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardValue {
    Count(u64),
    Items(Vec<Record>),
}

// == Snapshot ==
/// Everything the dashboard shows, loaded together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub active_patients: u64,
    pub active_professionals: u64,
    pub total_anamneses: u64,
    pub procedures: Vec<Record>,
    /// Counters that could not be loaded and show a fallback
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

// == Dashboard Service ==
#[derive(Clone)]
pub struct DashboardService {
    client: RestClient,
    cache: SharedCache<DashboardValue>,
}

impl DashboardService {
    pub fn new(client: RestClient, cache: SharedCache<DashboardValue>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> SharedCache<DashboardValue> {
        self.cache.clone()
    }

    /// `GET /pacientes/contar-ativos`, cached for an hour.
    pub async fn active_patients(&self) -> u64 {
        degrade(ACTIVE_PATIENTS_KEY, self.load_active_patients().await)
    }

    /// `GET /profissionais/contar-ativos`, cached for an hour.
    pub async fn active_professionals(&self) -> u64 {
        degrade(ACTIVE_PROFESSIONALS_KEY, self.load_active_professionals().await)
    }

    /// Length of `GET /anamneses`, cached for an hour.
    pub async fn total_anamneses(&self) -> u64 {
        degrade(TOTAL_ANAMNESES_KEY, self.load_total_anamneses().await)
    }

    /// `GET /procedimentos`, cached for a day.
    pub async fn procedures(&self) -> Vec<Record> {
        degrade(PROCEDURES_KEY, self.load_procedures().await)
    }

    /// Loads every counter concurrently.
    pub async fn snapshot(&self) -> DashboardSnapshot {
        let (patients, professionals, anamneses, procedures) = tokio::join!(
            self.load_active_patients(),
            self.load_active_professionals(),
            self.load_total_anamneses(),
            self.load_procedures(),
        );

        let warnings = [
            warning(ACTIVE_PATIENTS_KEY, &patients),
            warning(ACTIVE_PROFESSIONALS_KEY, &professionals),
            warning(TOTAL_ANAMNESES_KEY, &anamneses),
            warning(PROCEDURES_KEY, &procedures),
        ]
        .into_iter()
        .flatten()
        .collect();

        DashboardSnapshot {
            active_patients: degrade(ACTIVE_PATIENTS_KEY, patients),
            active_professionals: degrade(ACTIVE_PROFESSIONALS_KEY, professionals),
            total_anamneses: degrade(TOTAL_ANAMNESES_KEY, anamneses),
            procedures: degrade(PROCEDURES_KEY, procedures),
            warnings,
            generated_at: Utc::now(),
        }
    }

    /// Drops one cached counter. Returns whether it was cached.
    pub async fn invalidate(&self, key: &str) -> bool {
        let removed = self.cache.write().await.delete(key);
        debug!(key, removed, "Dashboard entry invalidated");
        removed
    }

    /// Drops every cached counter and loads them again.
    pub async fn refresh(&self) -> DashboardSnapshot {
        self.cache.write().await.clear();
        info!("Dashboard cache cleared, reloading");
        self.snapshot().await
    }

    // == Loaders ==
    async fn load_active_patients(&self) -> ApiResult<u64> {
        self.cached_count(ACTIVE_PATIENTS_KEY, || self.client.count_active("pacientes"))
            .await
    }

    async fn load_active_professionals(&self) -> ApiResult<u64> {
        self.cached_count(ACTIVE_PROFESSIONALS_KEY, || {
            self.client.count_active("profissionais")
        })
        .await
    }

    async fn load_total_anamneses(&self) -> ApiResult<u64> {
        self.cached_count(TOTAL_ANAMNESES_KEY, || async {
            self.client
                .list("anamneses")
                .await
                .map(|records| records.len() as u64)
        })
        .await
    }

    async fn load_procedures(&self) -> ApiResult<Vec<Record>> {
        if let Some(DashboardValue::Items(items)) = self.cache.write().await.get(PROCEDURES_KEY) {
            return Ok(items);
        }

        let items = self.client.list("procedimentos").await?;
        self.cache.write().await.set_for(
            PROCEDURES_KEY,
            DashboardValue::Items(items.clone()),
            CacheCategory::Catalog,
        );
        Ok(items)
    }

    async fn cached_count<F, Fut>(&self, key: &str, fetch: F) -> ApiResult<u64>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = ApiResult<u64>>,
    {
        if let Some(DashboardValue::Count(count)) = self.cache.write().await.get(key) {
            debug!(key, count, "Dashboard cache hit");
            return Ok(count);
        }

        let count = fetch().await?;
        self.cache
            .write()
            .await
            .set_for(key, DashboardValue::Count(count), CacheCategory::Counts);
        Ok(count)
    }
}

fn warning<T>(key: &str, result: &ApiResult<T>) -> Option<String> {
    result
        .as_ref()
        .err()
        .map(|err| format!("{key}: {}", err.user_message()))
}

fn degrade<T: Default>(key: &str, result: ApiResult<T>) -> T {
    result.unwrap_or_else(|err| {
        warn!(key, %err, "Dashboard counter unavailable, showing fallback");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::cache::{shared, ManualClock, TtlCache, TTL_1_HOUR};
    use crate::client::ClientConfig;

    fn service(server: &MockServer, clock: &ManualClock) -> DashboardService {
        let client = RestClient::new(
            ClientConfig::new(server.uri()).with_retries(0, Duration::from_millis(1)),
        )
        .unwrap();
        DashboardService::new(client, shared(TtlCache::new(Arc::new(clock.clone()))))
    }

    #[tokio::test]
    async fn test_counter_is_cached_until_ttl() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pacientes/contar-ativos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": 42 })))
            .expect(2)
            .mount(&server)
            .await;

        let clock = ManualClock::new(0);
        let dashboard = service(&server, &clock);

        assert_eq!(dashboard.active_patients().await, 42);
        assert_eq!(dashboard.active_patients().await, 42);
        assert_eq!(dashboard.cache().read().await.stats().total_entries, 1);

        clock.advance(TTL_1_HOUR);
        assert_eq!(dashboard.active_patients().await, 42);
    }

    #[tokio::test]
    async fn test_failure_degrades_and_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profissionais/contar-ativos"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let clock = ManualClock::new(0);
        let dashboard = service(&server, &clock);

        assert_eq!(dashboard.active_professionals().await, 0);
        assert!(dashboard.cache().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_collects_warnings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pacientes/contar-ativos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(7)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/profissionais/contar-ativos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 3 })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/anamneses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }, { "id": 2 }])))
            .mount(&server)
            .await;
        // /procedimentos is not mounted: wiremock answers 404

        let clock = ManualClock::new(0);
        let snapshot = service(&server, &clock).snapshot().await;

        assert_eq!(snapshot.active_patients, 7);
        assert_eq!(snapshot.active_professionals, 3);
        assert_eq!(snapshot.total_anamneses, 2);
        assert!(snapshot.procedures.is_empty());
        assert_eq!(snapshot.warnings.len(), 1);
        assert!(snapshot.warnings[0].starts_with(PROCEDURES_KEY));
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/procedimentos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{ "id": 1, "nome": "Avaliação" }]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let clock = ManualClock::new(0);
        let dashboard = service(&server, &clock);

        assert_eq!(dashboard.procedures().await.len(), 1);
        assert!(dashboard.invalidate(PROCEDURES_KEY).await);
        assert!(!dashboard.invalidate(PROCEDURES_KEY).await);
        assert_eq!(dashboard.procedures().await.len(), 1);
    }
}
