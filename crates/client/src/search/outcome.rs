//! Search results with their provenance.

use crate::openlibrary::Document;
use serde::Serialize;

/// Why a search returned degraded (empty) results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// The catalog answered with a non-success status.
    RemoteUnavailable { status: u16 },
    /// The request did not complete (network error or timeout).
    RemoteFailed { message: String },
    /// The catalog answered with a body that is not a search page.
    MalformedRemotePayload { message: String },
}

/// Where the documents of a search came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    /// Served from a fresh cache entry.
    Cache,
    /// Fetched from the catalog.
    Remote,
    /// Nothing to search for (empty query, unsupported type, no fields).
    Skipped,
    /// The catalog could not be used; `docs` is empty.
    Degraded(Degradation),
}

/// Documents returned by a search, at most the configured maximum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub docs: Vec<Document>,
    pub source: ResultSource,
}

impl SearchOutcome {
    pub fn skipped() -> Self {
        Self { docs: Vec::new(), source: ResultSource::Skipped }
    }

    pub fn degraded(reason: Degradation) -> Self {
        Self { docs: Vec::new(), source: ResultSource::Degraded(reason) }
    }

    pub fn is_cache_hit(&self) -> bool {
        self.source == ResultSource::Cache
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.source, ResultSource::Degraded(_))
    }
}
