//! Cached catalog search.
//!
//! ### Policy
//!
//! - Cache key: the literal query for simple search, the composed
//!   `field=value&...` string for advanced search. Keys are not normalized.
//! - A cache entry younger than the TTL (15 minutes) is served without a
//!   network call.
//! - Otherwise one catalog request is made; the first `max_results` (at most 15)
//!   documents are upserted into the cache and returned.
//! - Catalog failures yield an empty, degraded outcome and leave the cache
//!   untouched. An unreadable cache payload is treated as a miss.

pub mod outcome;

pub use outcome::{Degradation, ResultSource, SearchOutcome};

use crate::openlibrary::{AdvancedQuery, Catalog, CatalogError, CatalogQuery, Document, SearchType};
use chrono::Utc;
use libris_core::{AppConfig, MAX_SEARCH_RESULTS, SearchCacheEntry, SearchCacheStore};
use std::sync::Arc;

/// Default seconds a cached search stays fresh.
pub const DEFAULT_TTL_SECS: i64 = 15 * 60;

/// Default number of documents kept per search; also the hard cap.
pub const DEFAULT_MAX_RESULTS: usize = MAX_SEARCH_RESULTS;

/// Search aggregator over the catalog and the search cache.
#[derive(Clone)]
pub struct SearchService {
    catalog: Arc<dyn Catalog>,
    cache: Arc<dyn SearchCacheStore>,
    ttl: chrono::Duration,
    max_results: usize,
}

impl SearchService {
    pub fn new(catalog: Arc<dyn Catalog>, cache: Arc<dyn SearchCacheStore>) -> Self {
        Self { catalog, cache, ttl: chrono::Duration::seconds(DEFAULT_TTL_SECS), max_results: DEFAULT_MAX_RESULTS }
    }

    /// Build a service using the TTL and result limit from configuration.
    pub fn from_config(catalog: Arc<dyn Catalog>, cache: Arc<dyn SearchCacheStore>, config: &AppConfig) -> Self {
        Self::new(catalog, cache)
            .with_ttl(config.cache_ttl())
            .with_max_results(config.max_results)
    }

    pub fn with_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the result limit, clamped to `DEFAULT_MAX_RESULTS`.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.min(DEFAULT_MAX_RESULTS);
        self
    }

    /// Search a single field.
    ///
    /// An empty query or an unsupported search type returns an empty outcome
    /// without touching the cache or the catalog.
    pub async fn search(&self, query: &str, search_type: &SearchType) -> SearchOutcome {
        if query.is_empty() {
            return SearchOutcome::skipped();
        }

        let Some(field) = search_type.field() else {
            tracing::debug!(?search_type, "unsupported search type");
            return SearchOutcome::skipped();
        };

        self.cached_or_fetch(query, &CatalogQuery::single(field, query)).await
    }

    /// Search several fields at once.
    ///
    /// With no populated field, returns an empty outcome without touching the
    /// cache or the catalog.
    pub async fn advanced_search(&self, query: &AdvancedQuery) -> SearchOutcome {
        let request = query.to_catalog_query();
        if request.is_empty() {
            return SearchOutcome::skipped();
        }

        let key = request.composed();
        self.cached_or_fetch(&key, &request).await
    }

    async fn cached_or_fetch(&self, key: &str, request: &CatalogQuery) -> SearchOutcome {
        if let Some(docs) = self.fresh_cached(key).await {
            tracing::debug!(query = key, count = docs.len(), "search cache hit");
            return SearchOutcome { docs, source: ResultSource::Cache };
        }

        let mut docs = match self.catalog.search(request).await {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!(query = key, error = %e, "catalog search failed");
                return SearchOutcome::degraded(degradation_for(e));
            }
        };
        docs.truncate(self.max_results);

        match serde_json::to_string(&docs) {
            Ok(results_json) => {
                if let Err(e) = self.cache.upsert(&SearchCacheEntry::new(key, results_json)).await {
                    tracing::warn!(query = key, error = %e, "failed to cache search results");
                }
            }
            Err(e) => tracing::warn!(query = key, error = %e, "failed to serialize search results"),
        }

        tracing::debug!(query = key, count = docs.len(), "search fetched from catalog");
        SearchOutcome { docs, source: ResultSource::Remote }
    }

    /// Documents from a fresh, readable cache entry.
    async fn fresh_cached(&self, key: &str) -> Option<Vec<Document>> {
        let entry = match self.cache.find_by_key(key).await {
            Ok(entry) => entry?,
            Err(e) => {
                tracing::warn!(query = key, error = %e, "search cache lookup failed");
                return None;
            }
        };

        if !entry.is_fresh(Utc::now(), self.ttl) {
            tracing::debug!(query = key, fetched_at = %entry.fetched_at, "search cache entry is stale");
            return None;
        }

        match serde_json::from_str::<Vec<Document>>(&entry.results_json) {
            Ok(mut docs) => {
                docs.truncate(self.max_results);
                Some(docs)
            }
            Err(e) => {
                tracing::warn!(query = key, error = %e, "cached search results are unreadable; refetching");
                None
            }
        }
    }
}

fn degradation_for(err: CatalogError) -> Degradation {
    match err {
        CatalogError::HttpError { status } => Degradation::RemoteUnavailable { status },
        CatalogError::Parse(message) => Degradation::MalformedRemotePayload { message },
        e @ (CatalogError::Timeout | CatalogError::Network(_)) => Degradation::RemoteFailed { message: e.to_string() },
    }
}
