//! REST client for the clinic backend
//!
//! Thin reqwest wrapper that validates input before sending, turns non-2xx
//! statuses into typed errors and normalizes every payload through
//! [`envelope`](super::envelope). Idempotent GETs are retried with
//! exponential backoff; writes are sent once.

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::client::envelope::{error_message, normalize_count, normalize_item, normalize_list};
use crate::error::{ApiError, ApiResult};
use crate::models::Record;

/// REST client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `http://localhost:8080/api`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Extra attempts for a failing GET
    pub max_retries: u32,
    /// Delay before the first retry; doubled on every further attempt
    pub retry_base_delay: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(200),
        }
    }

    pub fn with_retries(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_base_delay = base_delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the backend's resource endpoints.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RestClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl RestClient {
    /// Builds a client. Fails on an empty base URL or if the HTTP stack
    /// cannot be initialized.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ApiError::Validation("base URL must not be empty".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self { config, http })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // == Reads ==
    /// `GET /{resource}`
    #[instrument(skip(self))]
    pub async fn list(&self, resource: &str) -> ApiResult<Vec<Record>> {
        validate_resource(resource)?;
        let body = self.get_json(resource).await?;
        normalize_list(body)
    }

    /// `GET /{resource}/ativos`
    #[instrument(skip(self))]
    pub async fn list_active(&self, resource: &str) -> ApiResult<Vec<Record>> {
        validate_resource(resource)?;
        let body = self.get_json(&format!("{resource}/ativos")).await?;
        normalize_list(body)
    }

    /// `GET /{resource}/contar-ativos`
    #[instrument(skip(self))]
    pub async fn count_active(&self, resource: &str) -> ApiResult<u64> {
        validate_resource(resource)?;
        let body = self.get_json(&format!("{resource}/contar-ativos")).await?;
        normalize_count(body)
    }

    // == Writes ==
    /// `POST /{resource}`
    #[instrument(skip(self, body))]
    pub async fn create(&self, resource: &str, body: &Value) -> ApiResult<Option<Record>> {
        validate_resource(resource)?;
        validate_body(body)?;
        let response = self.execute(Method::POST, resource, Some(body)).await?;
        normalize_item(response)
    }

    /// `PUT /{resource}/{id}`
    #[instrument(skip(self, body))]
    pub async fn update(&self, resource: &str, id: &str, body: &Value) -> ApiResult<Option<Record>> {
        validate_resource(resource)?;
        validate_id(id)?;
        validate_body(body)?;
        let response = self
            .execute(Method::PUT, &format!("{resource}/{id}"), Some(body))
            .await?;
        normalize_item(response)
    }

    /// `DELETE /{resource}/{id}`
    #[instrument(skip(self))]
    pub async fn delete(&self, resource: &str, id: &str) -> ApiResult<()> {
        validate_resource(resource)?;
        validate_id(id)?;
        let response = self
            .execute(Method::DELETE, &format!("{resource}/{id}"), None)
            .await?;
        // An envelope with success=false still counts as a failure
        normalize_item(response).map(|_| ())
    }

    // == Transport ==
    async fn get_json(&self, path: &str) -> ApiResult<Value> {
        let mut attempt = 0u32;
        loop {
            match self.execute(Method::GET, path, None).await {
                Ok(Some(body)) => return Ok(body),
                Ok(None) => {
                    return Err(ApiError::MalformedResponse(format!(
                        "empty body from GET /{path}"
                    )))
                }
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.retry_base_delay * 2u32.saturating_pow(attempt);
                    attempt += 1;
                    warn!(%err, attempt, ?delay, path, "GET failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ApiResult<Option<Value>> {
        let url = self.url(path);
        debug!(%method, %url, "Sending request");

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(&text).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// == Validation ==
fn validate_resource(resource: &str) -> ApiResult<()> {
    let valid = !resource.is_empty()
        && resource
            .split('/')
            .all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            });

    if valid {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("invalid resource path: {resource:?}")))
    }
}

/// Ids go into the URL verbatim, so only plain segment characters pass and
/// the dot segments `.` and `..` are refused.
fn validate_id(id: &str) -> ApiResult<()> {
    let plain = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');

    if plain && id != "." && id != ".." {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("invalid record id: {id:?}")))
    }
}

fn validate_body(body: &Value) -> ApiResult<()> {
    if body.is_object() {
        Ok(())
    } else {
        Err(ApiError::Validation("request body must be a JSON object".into()))
    }
}
