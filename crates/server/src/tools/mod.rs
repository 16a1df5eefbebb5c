//! MCP tool implementations.
//!
//! This module contains all tools exposed by the libris server.

pub mod authors;
pub mod favorites;
pub mod search;

pub use authors::{
    AuthorCreateParams, AuthorDeleteParams, AuthorGetParams, AuthorListParams, AuthorLookupParams, AuthorUpdateParams,
};
pub use favorites::{FavoriteAddParams, FavoriteGetParams, FavoriteListParams, FavoriteRemoveParams};
pub use search::{BookAdvancedSearchParams, BookSearchParams};

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Render a tool output as pretty-printed JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize output: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
