//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::{AppConfig, MAX_SEARCH_RESULTS};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 60 seconds
    /// - `user_agent` is empty
    /// - `catalog_base_url` is not an absolute http(s) URL
    /// - `cache_ttl_secs`, `max_results` or `favorites_limit` is not positive
    /// - `max_results` exceeds `MAX_SEARCH_RESULTS` (15)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 60 seconds (60000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        match url::Url::parse(&self.catalog_base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                return Err(ConfigError::Invalid {
                    field: "catalog_base_url".into(),
                    reason: format!("unsupported scheme: {}", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "catalog_base_url".into(), reason: e.to_string() });
            }
        }

        if self.cache_ttl_secs <= 0 {
            return Err(ConfigError::Invalid { field: "cache_ttl_secs".into(), reason: "must be greater than 0".into() });
        }

        if self.max_results == 0 {
            return Err(ConfigError::Invalid { field: "max_results".into(), reason: "must be greater than 0".into() });
        }
        if self.max_results > MAX_SEARCH_RESULTS {
            return Err(ConfigError::Invalid {
                field: "max_results".into(),
                reason: format!("must not exceed {MAX_SEARCH_RESULTS}"),
            });
        }

        if self.favorites_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "favorites_limit".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.cache_ttl_secs > 24 * 60 * 60 {
            tracing::warn!(
                cache_ttl_secs = self.cache_ttl_secs,
                "cache_ttl_secs is longer than a day; search results may be very stale"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 60_001, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_bad_base_url() {
        let config = AppConfig { catalog_base_url: "not a url".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "catalog_base_url"));

        let config = AppConfig { catalog_base_url: "ftp://openlibrary.org".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "catalog_base_url"));
    }

    #[test]
    fn test_validate_zero_limits() {
        let config = AppConfig { max_results: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "max_results"));

        let config = AppConfig { favorites_limit: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "favorites_limit"));

        let config = AppConfig { cache_ttl_secs: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "cache_ttl_secs"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { timeout_ms: 100, max_results: 1, favorites_limit: 1, ..Default::default() };
        assert!(config.validate().is_ok());

        let config = AppConfig { timeout_ms: 60_000, max_results: MAX_SEARCH_RESULTS, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_results_above_cap() {
        let config = AppConfig { max_results: 16, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "max_results"));

        let config = AppConfig { max_results: 100, ..Default::default() };
        assert!(config.validate().is_err());
    }
}
