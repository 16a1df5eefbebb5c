//! Search cache operations.
//!
//! Caches OpenLibrary search results keyed by the exact query string. Keys are
//! not normalized: `"Tolkien"` and `"tolkien "` are distinct entries. Entries
//! are upserted on every fetch and never deleted.

use super::connection::LibraryDb;
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;

/// A cached search result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCacheEntry {
    /// Cache key: the literal simple query or the composed advanced query.
    pub query: String,
    /// When the results were last fetched from the catalog.
    pub fetched_at: DateTime<Utc>,
    /// Serialized list of documents.
    pub results_json: String,
}

impl SearchCacheEntry {
    pub fn new(query: impl Into<String>, results_json: impl Into<String>) -> Self {
        Self { query: query.into(), fetched_at: Utc::now(), results_json: results_json.into() }
    }

    /// Whether the entry is younger than `ttl` at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.fetched_at) < ttl
    }
}

/// Key-value access to the search cache.
///
/// The read-then-upsert sequence is not locked; concurrent misses on the same
/// key both write and the last write wins.
#[async_trait::async_trait]
pub trait SearchCacheStore: Send + Sync {
    /// Get the entry stored under `query`, if any.
    async fn find_by_key(&self, query: &str) -> Result<Option<SearchCacheEntry>, Error>;

    /// Insert the entry, or replace the timestamp and payload of an existing one.
    async fn upsert(&self, entry: &SearchCacheEntry) -> Result<(), Error>;
}

#[async_trait::async_trait]
impl SearchCacheStore for LibraryDb {
    async fn find_by_key(&self, query: &str) -> Result<Option<SearchCacheEntry>, Error> {
        let query = query.to_string();
        let row = self
            .conn
            .call(move |conn| -> Result<Option<(String, String, String)>, Error> {
                let mut stmt =
                    conn.prepare("SELECT query, fetched_at, results_json FROM search_cache WHERE query = ?1")?;

                let result = stmt.query_row(params![query], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)));

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        let Some((query, fetched_at, results_json)) = row else {
            return Ok(None);
        };

        let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
            .map_err(|e| Error::Corrupt(format!("search_cache.fetched_at for {query:?}: {e}")))?
            .with_timezone(&Utc);

        Ok(Some(SearchCacheEntry { query, fetched_at, results_json }))
    }

    async fn upsert(&self, entry: &SearchCacheEntry) -> Result<(), Error> {
        let query = entry.query.clone();
        let fetched_at = entry.fetched_at.to_rfc3339();
        let results_json = entry.results_json.clone();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO search_cache (query, fetched_at, results_json)
                    VALUES (?1, ?2, ?3)
                    ON CONFLICT(query) DO UPDATE SET
                        fetched_at = excluded.fetched_at,
                        results_json = excluded.results_json",
                    params![query, fetched_at, results_json],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

impl LibraryDb {
    /// Number of cached queries.
    pub async fn search_cache_len(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM search_cache", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
