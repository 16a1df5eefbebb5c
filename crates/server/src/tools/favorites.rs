//! favorite_add, favorite_get, favorite_list and favorite_remove tool implementations.

use super::json_result;
use libris_client::{AuthorEnrichment, Library, cover_image_url};
use libris_core::{Author, Error, FavoriteBook, LibraryDb, NewFavorite};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for the favorite_add tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FavoriteAddParams {
    /// Owner of the favorites list.
    pub user_id: String,

    /// Work key from a search result, e.g. `/works/OL27448W`.
    pub open_library_id: String,

    pub title: String,

    /// Author as shown on the book; saved to the author list on first sight.
    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub cover_id: Option<i64>,

    #[serde(default)]
    pub first_publish_year: Option<i32>,
}

impl From<FavoriteAddParams> for NewFavorite {
    fn from(params: FavoriteAddParams) -> Self {
        Self {
            open_library_id: params.open_library_id,
            title: params.title,
            author: params.author,
            cover_id: params.cover_id,
            first_publish_year: params.first_publish_year,
            cover_image_url: params.cover_id.map(cover_image_url),
        }
    }
}

/// Output from the favorite_add tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FavoriteAddOutput {
    /// False when the book was already a favorite.
    pub added: bool,
    pub favorite: FavoriteBook,
    /// One of existing, created or skipped.
    pub author_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

/// Input parameters for the favorite_list tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FavoriteListParams {
    pub user_id: String,
}

/// Output from the favorite_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FavoriteListOutput {
    pub favorites: Vec<FavoriteBook>,
    /// Maximum number of favorites per user.
    pub limit: usize,
}

/// Input parameters for the favorite_get tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FavoriteGetParams {
    pub user_id: String,
    pub id: i64,
}

/// Output from the favorite_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FavoriteGetOutput {
    pub favorite: FavoriteBook,
}

/// Input parameters for the favorite_remove tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FavoriteRemoveParams {
    pub user_id: String,
    /// Favorite id as returned by favorite_add or favorite_list.
    pub id: i64,
}

/// Output from the favorite_remove tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FavoriteRemoveOutput {
    pub removed: bool,
}

/// Implementation of the favorite_add tool.
pub async fn add_impl(library: &Library, params: FavoriteAddParams) -> Result<CallToolResult, McpError> {
    let user_id = params.user_id.clone();
    let outcome = library.add_book(&user_id, &params.into()).await?;

    let (author_status, author) = match outcome.author {
        AuthorEnrichment::Existing(author) => ("existing", Some(author)),
        AuthorEnrichment::Created(author) => ("created", Some(author)),
        AuthorEnrichment::Skipped => ("skipped", None),
    };

    let output = FavoriteAddOutput {
        added: outcome.favorite.is_new(),
        favorite: outcome.favorite.book().clone(),
        author_status: author_status.into(),
        author,
    };
    json_result(&output)
}

/// Implementation of the favorite_list tool.
pub async fn list_impl(db: &LibraryDb, limit: usize, params: FavoriteListParams) -> Result<CallToolResult, McpError> {
    if params.user_id.trim().is_empty() {
        return Err(Error::InvalidInput("user_id cannot be empty".into()).into());
    }

    let favorites = db.list_favorites(&params.user_id).await?;
    json_result(&FavoriteListOutput { favorites, limit })
}

/// Implementation of the favorite_get tool.
pub async fn get_impl(db: &LibraryDb, params: FavoriteGetParams) -> Result<CallToolResult, McpError> {
    let favorite = db
        .get_favorite(params.id, &params.user_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("favorite {} for user {}", params.id, params.user_id)))?;
    json_result(&FavoriteGetOutput { favorite })
}

/// Implementation of the favorite_remove tool.
pub async fn remove_impl(db: &LibraryDb, params: FavoriteRemoveParams) -> Result<CallToolResult, McpError> {
    if !db.remove_favorite(params.id, &params.user_id).await? {
        return Err(Error::NotFound(format!("favorite {} for user {}", params.id, params.user_id)).into());
    }

    json_result(&FavoriteRemoveOutput { removed: true })
}
