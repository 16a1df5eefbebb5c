//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::state::AppState;
use crate::tools::{
    AuthorCreateParams, AuthorDeleteParams, AuthorGetParams, AuthorListParams, AuthorLookupParams, AuthorUpdateParams,
    BookAdvancedSearchParams, BookSearchParams, FavoriteAddParams, FavoriteGetParams, FavoriteListParams,
    FavoriteRemoveParams, authors, favorites, search,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for libris.
#[derive(Clone)]
pub struct LibrisServer {
    state: AppState,
    favorites_limit: usize,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl LibrisServer {
    /// Create a new server handler.
    pub fn new(state: AppState, favorites_limit: usize) -> Self {
        Self { state, favorites_limit, tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Search OpenLibrary books by one field (author by default). Recent searches are served from a cache (15 minutes by default); catalog failures return an empty, degraded result."
    )]
    async fn book_search(&self, params: Parameters<BookSearchParams>) -> Result<CallToolResult, McpError> {
        search::search_impl(&self.state.search, params.0).await
    }

    #[tool(description = "Search OpenLibrary books by title, author, subject and free text combined.")]
    async fn book_advanced_search(
        &self, params: Parameters<BookAdvancedSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        search::advanced_search_impl(&self.state.search, params.0).await
    }

    #[tool(
        description = "Look up an author by catalog key or by name. Returns birth date and city when known; optionally saves the author for a user."
    )]
    async fn author_lookup(&self, params: Parameters<AuthorLookupParams>) -> Result<CallToolResult, McpError> {
        authors::lookup_impl(&self.state, params.0).await
    }

    #[tool(
        description = "Add a book to a user's favorites, up to a configured limit (10 by default). The book's author is saved to the user's author list the first time it appears."
    )]
    async fn favorite_add(&self, params: Parameters<FavoriteAddParams>) -> Result<CallToolResult, McpError> {
        favorites::add_impl(&self.state.library, params.0).await
    }

    #[tool(description = "Get one of a user's favorite books by id.")]
    async fn favorite_get(&self, params: Parameters<FavoriteGetParams>) -> Result<CallToolResult, McpError> {
        favorites::get_impl(self.state.db(), params.0).await
    }

    #[tool(description = "List a user's favorite books.")]
    async fn favorite_list(&self, params: Parameters<FavoriteListParams>) -> Result<CallToolResult, McpError> {
        favorites::list_impl(self.state.db(), self.favorites_limit, params.0).await
    }

    #[tool(description = "Remove a favorite book by id.")]
    async fn favorite_remove(&self, params: Parameters<FavoriteRemoveParams>) -> Result<CallToolResult, McpError> {
        favorites::remove_impl(self.state.db(), params.0).await
    }

    #[tool(description = "List the authors saved for a user, ordered by name.")]
    async fn author_list(&self, params: Parameters<AuthorListParams>) -> Result<CallToolResult, McpError> {
        authors::list_impl(self.state.db(), params.0).await
    }

    #[tool(description = "Save an author to a user's list. The email, when given, must contain '@'.")]
    async fn author_create(&self, params: Parameters<AuthorCreateParams>) -> Result<CallToolResult, McpError> {
        authors::create_impl(self.state.db(), params.0).await
    }

    #[tool(description = "Get one of a user's saved authors by id.")]
    async fn author_get(&self, params: Parameters<AuthorGetParams>) -> Result<CallToolResult, McpError> {
        authors::get_impl(self.state.db(), params.0).await
    }

    #[tool(description = "Replace the name, birth date, city and email of a saved author.")]
    async fn author_update(&self, params: Parameters<AuthorUpdateParams>) -> Result<CallToolResult, McpError> {
        authors::update_impl(self.state.db(), params.0).await
    }

    #[tool(description = "Delete a saved author by id.")]
    async fn author_delete(&self, params: Parameters<AuthorDeleteParams>) -> Result<CallToolResult, McpError> {
        authors::delete_impl(self.state.db(), params.0).await
    }
}

impl ServerHandler for LibrisServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "libris".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::offline_state;

    #[tokio::test]
    async fn test_router_lists_all_tools() {
        let server = LibrisServer::new(offline_state().await, 10);

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "author_create",
                "author_delete",
                "author_get",
                "author_list",
                "author_lookup",
                "author_update",
                "book_advanced_search",
                "book_search",
                "favorite_add",
                "favorite_get",
                "favorite_list",
                "favorite_remove",
            ]
        );
    }

    #[tokio::test]
    async fn test_configurable_limits_described_as_defaults() {
        let server = LibrisServer::new(offline_state().await, 3);

        for tool in server.tool_router.list_all() {
            let description = tool.description.as_deref().unwrap_or_default();
            if description.contains("15 minutes") || description.contains("(10") {
                assert!(description.contains("by default"), "{} states a configurable value as fixed", tool.name);
            }
        }
    }
}
