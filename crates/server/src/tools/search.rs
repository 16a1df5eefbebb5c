//! book_search and book_advanced_search tool implementations.
//!
//! Both tools answer from the search cache when it is fresh and fall back to
//! the catalog otherwise. Catalog failures are reported as degraded results,
//! never as tool errors.

use super::json_result;
use libris_client::{AdvancedQuery, Degradation, Document, ResultSource, SearchOutcome, SearchService, SearchType};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for the book_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BookSearchParams {
    /// Search text.
    pub query: String,

    /// Field to search: all, text, author (default), title, subject, person,
    /// place, publisher, isbn or lists.
    #[serde(default)]
    pub search_type: Option<String>,
}

/// Input parameters for the book_advanced_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BookAdvancedSearchParams {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub subject: Option<String>,

    /// Free text matched against every field.
    #[serde(default)]
    pub query: Option<String>,
}

/// Output of both search tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookSearchOutput {
    pub results: Vec<BookResult>,
    /// One of cache, remote, skipped or degraded.
    pub source: String,
    /// Why the results are degraded, if they are.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
}

/// A single search result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookResult {
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// 0 when unknown.
    pub first_publish_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<i64>,
    /// Work key, usable as `open_library_id` for favorite_add.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

impl From<&Document> for BookResult {
    fn from(doc: &Document) -> Self {
        Self {
            title: doc.title.clone(),
            authors: doc.author_name.clone().unwrap_or_default(),
            first_publish_year: doc.first_publish_year,
            cover_id: doc.cover_i,
            key: doc.key.clone(),
            cover_image_url: doc.cover_image_url(),
        }
    }
}

impl From<&SearchOutcome> for BookSearchOutput {
    fn from(outcome: &SearchOutcome) -> Self {
        let (source, degraded_reason) = match &outcome.source {
            ResultSource::Cache => ("cache", None),
            ResultSource::Remote => ("remote", None),
            ResultSource::Skipped => ("skipped", None),
            ResultSource::Degraded(reason) => ("degraded", Some(describe(reason))),
        };

        Self { results: outcome.docs.iter().map(BookResult::from).collect(), source: source.into(), degraded_reason }
    }
}

fn describe(reason: &Degradation) -> String {
    match reason {
        Degradation::RemoteUnavailable { status } => format!("catalog returned HTTP {status}"),
        Degradation::RemoteFailed { message } => format!("catalog request failed: {message}"),
        Degradation::MalformedRemotePayload { message } => format!("catalog response unreadable: {message}"),
    }
}

/// Implementation of the book_search tool.
pub async fn search_impl(search: &SearchService, params: BookSearchParams) -> Result<CallToolResult, McpError> {
    let search_type = SearchType::from_param(params.search_type.as_deref());
    let outcome = search.search(&params.query, &search_type).await;
    json_result(&BookSearchOutput::from(&outcome))
}

/// Implementation of the book_advanced_search tool.
pub async fn advanced_search_impl(
    search: &SearchService, params: BookAdvancedSearchParams,
) -> Result<CallToolResult, McpError> {
    let query = AdvancedQuery { title: params.title, author: params.author, subject: params.subject, query: params.query };
    let outcome = search.advanced_search(&query).await;
    json_result(&BookSearchOutput::from(&outcome))
}
