//! Listing service
//!
//! Fetches a resource list once per TTL window and serves filtered pages of
//! it through [`FilterState`].

use tracing::debug;

use crate::cache::{CacheCategory, SharedCache};
use crate::client::RestClient;
use crate::error::ApiResult;
use crate::filter::{FilterState, ListPage};
use crate::models::Record;
use crate::search::SearchCategory;

/// Fields searched for resources that are not a search category.
const FALLBACK_FIELDS: &[&str] = &["nome"];

#[derive(Clone)]
pub struct ListService {
    client: RestClient,
    cache: SharedCache<Vec<Record>>,
}

impl ListService {
    pub fn new(client: RestClient, cache: SharedCache<Vec<Record>>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> SharedCache<Vec<Record>> {
        self.cache.clone()
    }

    /// Full list of `resource`, cached for ten minutes.
    pub async fn records(&self, resource: &str) -> ApiResult<Vec<Record>> {
        if let Some(records) = self.cache.write().await.get(resource) {
            debug!(resource, count = records.len(), "List cache hit");
            return Ok(records);
        }

        let records = self.client.list(resource).await?;
        self.cache
            .write()
            .await
            .set_for(resource, records.clone(), CacheCategory::Lists);
        Ok(records)
    }

    /// One page of `resource` as seen through `filter`.
    pub async fn page(&self, resource: &str, filter: &FilterState) -> ApiResult<ListPage> {
        let records = self.records(resource).await?;
        Ok(filter.apply(&records, searchable_fields(resource)))
    }

    /// Forgets the cached list of `resource`, e.g. after a write.
    pub async fn invalidate(&self, resource: &str) -> bool {
        self.cache.write().await.delete(resource)
    }
}

fn searchable_fields(resource: &str) -> &'static [&'static str] {
    SearchCategory::from_resource(resource)
        .map(SearchCategory::fields)
        .unwrap_or(FALLBACK_FIELDS)
}
