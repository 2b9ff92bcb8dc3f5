//! Search engine
//!
//! Runs one query: result-cache lookup, parallel fan-out to every source,
//! matching and grouping. Knows nothing about timing or rendering; that is
//! the session's job.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::cache::{shared, CacheCategory, Clock, SharedCache, TtlCache};
use crate::error::{ApiError, ApiResult};
use crate::search::{build_groups, QueryPlan, RecordSource, ResultGroup, SearchCategory, SlotLimits};

// == Search Outcome ==
/// Grouped results of one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    /// Category named in the query, if any
    pub prioritized: Option<SearchCategory>,
    pub groups: Vec<ResultGroup>,
    /// Sources that failed and contributed nothing
    pub failed: Vec<SearchCategory>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total matches across groups, before slot capping.
    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.total).sum()
    }
}

// == Search Engine ==
pub struct SearchEngine {
    sources: Vec<Arc<dyn RecordSource>>,
    /// Results keyed by lowercased, trimmed query
    cache: SharedCache<SearchOutcome>,
    limits: SlotLimits,
}

impl SearchEngine {
    pub fn new(
        sources: Vec<Arc<dyn RecordSource>>,
        cache: SharedCache<SearchOutcome>,
        limits: SlotLimits,
    ) -> Self {
        Self {
            sources,
            cache,
            limits,
        }
    }

    /// Engine with its own unbounded result cache and default slot limits.
    pub fn with_clock(sources: Vec<Arc<dyn RecordSource>>, clock: Arc<dyn Clock>) -> Self {
        Self::new(sources, shared(TtlCache::new(clock)), SlotLimits::default())
    }

    pub fn cache(&self) -> SharedCache<SearchOutcome> {
        self.cache.clone()
    }

    // == Search ==
    /// Answers `query` from cache or by querying every source concurrently.
    ///
    /// A failing source contributes nothing and is listed in
    /// [`SearchOutcome::failed`]. Only when every source fails is the query an
    /// error. Outcomes with failed sources are not cached.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> ApiResult<SearchOutcome> {
        let query = query.trim();
        let key = query.to_lowercase();
        let plan = QueryPlan::parse(&key);

        if key.is_empty() {
            return Ok(SearchOutcome {
                query: String::new(),
                prioritized: None,
                groups: Vec::new(),
                failed: Vec::new(),
            });
        }

        let cached = self.cache.write().await.get(&key);
        if let Some(outcome) = cached {
            debug!(query, "Search cache hit");
            return Ok(outcome);
        }

        let settled = join_all(self.sources.iter().map(|source| async move {
            (source.category(), source.fetch().await)
        }))
        .await;

        let mut fetched = Vec::with_capacity(settled.len());
        let mut failed = Vec::new();
        let mut first_error: Option<ApiError> = None;

        for (category, result) in settled {
            match result {
                Ok(records) => fetched.push((category, records)),
                Err(err) => {
                    warn!(?category, %err, "Search source failed");
                    failed.push(category);
                    first_error.get_or_insert(err);
                }
            }
        }

        if fetched.is_empty() {
            if let Some(err) = first_error {
                return Err(err);
            }
        }

        let outcome = SearchOutcome {
            query: query.to_string(),
            prioritized: plan.prioritized,
            groups: build_groups(&plan, fetched, &self.limits),
            failed,
        };

        if outcome.failed.is_empty() {
            self.cache
                .write()
                .await
                .set_for(key, outcome.clone(), CacheCategory::SearchResults);
        }

        debug!(query, total = outcome.total(), "Search completed");
        Ok(outcome)
    }
}
