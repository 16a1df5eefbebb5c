//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (LIBRIS_*)
//! 2. TOML config file (if LIBRIS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Upper bound on documents returned and cached per search.
pub const MAX_SEARCH_RESULTS: usize = 15;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (LIBRIS_*)
/// 2. TOML config file (if LIBRIS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite database holding the search cache, favorites and authors.
    ///
    /// Set via LIBRIS_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for catalog requests.
    ///
    /// Set via LIBRIS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Catalog request timeout in milliseconds.
    ///
    /// Set via LIBRIS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Base URL of the OpenLibrary catalog.
    ///
    /// Set via LIBRIS_CATALOG_BASE_URL environment variable.
    #[serde(default = "default_catalog_base_url")]
    pub catalog_base_url: String,

    /// Seconds a cached search stays fresh.
    ///
    /// Set via LIBRIS_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: i64,

    /// Number of documents kept per search.
    ///
    /// Set via LIBRIS_MAX_RESULTS environment variable.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Maximum favorite books per user.
    ///
    /// Set via LIBRIS_FAVORITES_LIMIT environment variable.
    #[serde(default = "default_favorites_limit")]
    pub favorites_limit: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./libris.sqlite")
}

fn default_user_agent() -> String {
    "libris/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_catalog_base_url() -> String {
    "https://openlibrary.org".into()
}

fn default_cache_ttl_secs() -> i64 {
    15 * 60
}

fn default_max_results() -> usize {
    MAX_SEARCH_RESULTS
}

fn default_favorites_limit() -> usize {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            catalog_base_url: default_catalog_base_url(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_results: default_max_results(),
            favorites_limit: default_favorites_limit(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL as a chrono duration, for comparison against stored timestamps.
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `LIBRIS_`
    /// 2. TOML file from `LIBRIS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LIBRIS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("LIBRIS_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
