//! Search data sources
//!
//! The engine fans out to one [`RecordSource`] per category. Production
//! sources read the backend; tests substitute their own.

use async_trait::async_trait;

use crate::client::RestClient;
use crate::error::ApiResult;
use crate::models::Record;
use crate::search::SearchCategory;

/// A list of records belonging to one search category.
#[async_trait]
pub trait RecordSource: Send + Sync {
    fn category(&self) -> SearchCategory;

    async fn fetch(&self) -> ApiResult<Vec<Record>>;
}

/// Source reading `GET /{resource}` for its category.
#[derive(Debug, Clone)]
pub struct ResourceSource {
    client: RestClient,
    category: SearchCategory,
}

impl ResourceSource {
    pub fn new(client: RestClient, category: SearchCategory) -> Self {
        Self { client, category }
    }

    /// One source per category, all sharing `client`.
    pub fn all(client: &RestClient) -> Vec<Self> {
        SearchCategory::ALL
            .into_iter()
            .map(|category| Self::new(client.clone(), category))
            .collect()
    }
}

#[async_trait]
impl RecordSource for ResourceSource {
    fn category(&self) -> SearchCategory {
        self.category
    }

    async fn fetch(&self) -> ApiResult<Vec<Record>> {
        self.client.list(self.category.resource()).await
    }
}


#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::RecordSource;
    use crate::error::{ApiError, ApiResult};
    use crate::models::Record;
    use crate::search::SearchCategory;

    /// In-memory source with scripted latency and failure.
    pub(crate) struct FakeSource {
        category: SearchCategory,
        records: Vec<Record>,
        fail: bool,
        delays: Mutex<VecDeque<Duration>>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeSource {
        pub(crate) fn new(category: SearchCategory, records: Vec<Record>) -> Self {
            Self {
                category,
                records,
                fail: false,
                delays: Mutex::new(VecDeque::new()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub(crate) fn failing(category: SearchCategory) -> Self {
            Self {
                fail: true,
                ..Self::new(category, Vec::new())
            }
        }

        /// Latency of successive fetches; later fetches are instant.
        pub(crate) fn with_delays(self, delays: impl IntoIterator<Item = Duration>) -> Self {
            *self.delays.lock() = delays.into_iter().collect();
            self
        }

        pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
            self.calls.clone()
        }
    }

    #[async_trait]
    impl RecordSource for FakeSource {
        fn category(&self) -> SearchCategory {
            self.category
        }

        async fn fetch(&self) -> ApiResult<Vec<Record>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.delays.lock().pop_front();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ApiError::Http {
                    status: 500,
                    message: "source unavailable".into(),
                });
            }
            Ok(self.records.clone())
        }
    }
}
