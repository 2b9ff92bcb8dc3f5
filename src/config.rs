//! Configuration Module
//!
//! Loads settings from environment variables, falling back to defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::client::ClientConfig;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the clinic REST backend
    pub api_base_url: String,
    /// Port of the local HTTP service
    pub server_port: u16,
    /// Search debounce window in milliseconds
    pub search_debounce_ms: u64,
    /// Grace delay before a blurred search closes, in milliseconds
    pub search_blur_grace_ms: u64,
    /// Interval between cache sweeps in seconds
    pub cache_cleanup_interval: u64,
    /// Capacity bound per cache; `None` leaves caches bounded only by TTL
    pub cache_max_entries: Option<usize>,
    /// Backend request timeout in seconds
    pub http_timeout_secs: u64,
    /// Retries for failing idempotent GETs
    pub http_max_retries: u32,
}

impl Config {
    /// Loads the configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Backend base URL (default: http://localhost:8080/api)
    /// - `SERVER_PORT` - Local HTTP port (default: 3000)
    /// - `SEARCH_DEBOUNCE_MS` - Debounce window (default: 300)
    /// - `SEARCH_BLUR_GRACE_MS` - Blur grace delay (default: 150)
    /// - `CACHE_CLEANUP_INTERVAL` - Sweep interval in seconds (default: 1800)
    /// - `CACHE_MAX_ENTRIES` - Per-cache capacity, 0 for unbounded (default: 0)
    /// - `HTTP_TIMEOUT_SECS` - Request timeout (default: 10)
    /// - `HTTP_MAX_RETRIES` - GET retries (default: 2)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base_url),
            server_port: parse_env("SERVER_PORT").unwrap_or(defaults.server_port),
            search_debounce_ms: parse_env("SEARCH_DEBOUNCE_MS")
                .unwrap_or(defaults.search_debounce_ms),
            search_blur_grace_ms: parse_env("SEARCH_BLUR_GRACE_MS")
                .unwrap_or(defaults.search_blur_grace_ms),
            cache_cleanup_interval: parse_env("CACHE_CLEANUP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cache_cleanup_interval),
            cache_max_entries: parse_env::<usize>("CACHE_MAX_ENTRIES").filter(|max| *max > 0),
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS").unwrap_or(defaults.http_timeout_secs),
            http_max_retries: parse_env("HTTP_MAX_RETRIES").unwrap_or(defaults.http_max_retries),
        }
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cache_cleanup_interval)
    }

    /// Settings for the backend client.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_base_url.clone())
            .with_timeout(Duration::from_secs(self.http_timeout_secs))
            .with_retries(self.http_max_retries, Duration::from_millis(200))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            server_port: 3000,
            search_debounce_ms: 300,
            search_blur_grace_ms: 150,
            cache_cleanup_interval: 30 * 60,
            cache_max_entries: None,
            http_timeout_secs: 10,
            http_max_retries: 2,
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.cleanup_interval(), Duration::from_secs(1_800));
        assert!(config.cache_max_entries.is_none());
    }

    #[test]
    fn test_client_config_carries_http_settings() {
        let config = Config {
            http_timeout_secs: 3,
            http_max_retries: 5,
            ..Config::default()
        };

        let client = config.client_config();
        assert_eq!(client.base_url, "http://localhost:8080/api");
        assert_eq!(client.timeout, Duration::from_secs(3));
        assert_eq!(client.max_retries, 5);
    }

    #[test]
    fn test_config_from_env() {
        // Only this test touches these variables
        env::set_var("SEARCH_DEBOUNCE_MS", "450");
        env::set_var("CACHE_MAX_ENTRIES", "0");
        env::set_var("HTTP_MAX_RETRIES", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.search_debounce_ms, 450);
        assert!(config.cache_max_entries.is_none());
        assert_eq!(config.http_max_retries, 2);

        env::remove_var("SEARCH_DEBOUNCE_MS");
        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("HTTP_MAX_RETRIES");
    }
}
