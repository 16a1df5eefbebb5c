//! Author tools: catalog lookup plus create, read, update, list and delete of
//! a user's saved authors.

use super::json_result;
use crate::state::AppState;
use chrono::NaiveDate;
use libris_client::{AuthorLookup, AuthorProfile};
use libris_core::{Author, Error, LibraryDb, NewAuthor};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for the author_lookup tool.
///
/// Exactly one of `key` and `name` must be given.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AuthorLookupParams {
    /// Catalog author key, e.g. `OL23919A` or `/authors/OL23919A`.
    #[serde(default)]
    pub key: Option<String>,

    /// Free-text author name.
    #[serde(default)]
    pub name: Option<String>,

    /// Save the profile to this user's author list.
    #[serde(default)]
    pub save_for_user: Option<String>,
}

/// Author details returned by a lookup.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProfileOutput {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl From<&AuthorProfile> for ProfileOutput {
    fn from(profile: &AuthorProfile) -> Self {
        Self { full_name: profile.full_name.clone(), date_of_birth: profile.date_of_birth, city: profile.city.clone() }
    }
}

/// Output from the author_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AuthorLookupOutput {
    /// One of resolved, fallback or absent.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileOutput>,
    /// The stored author when `save_for_user` was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<Author>,
}

/// Input parameters for the author_list tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AuthorListParams {
    pub user_id: String,
}

/// Output from the author_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AuthorListOutput {
    pub authors: Vec<Author>,
}

/// Editable author fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AuthorFields {
    pub full_name: String,

    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

impl From<AuthorFields> for NewAuthor {
    fn from(fields: AuthorFields) -> Self {
        Self { full_name: fields.full_name, date_of_birth: fields.date_of_birth, city: fields.city, email: fields.email }
    }
}

/// Input parameters for the author_create tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AuthorCreateParams {
    pub user_id: String,
    #[serde(flatten)]
    pub author: AuthorFields,
}

/// Input parameters for the author_update tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AuthorUpdateParams {
    pub user_id: String,
    pub id: i64,
    #[serde(flatten)]
    pub author: AuthorFields,
}

/// Input parameters for the author_get tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AuthorGetParams {
    pub user_id: String,
    pub id: i64,
}

/// Output of author_create, author_update and author_get.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AuthorOutput {
    pub author: Author,
}

/// Input parameters for the author_delete tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AuthorDeleteParams {
    pub user_id: String,
    pub id: i64,
}

/// Output from the author_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AuthorDeleteOutput {
    pub deleted: bool,
}

/// Implementation of the author_lookup tool.
pub async fn lookup_impl(state: &AppState, params: AuthorLookupParams) -> Result<CallToolResult, McpError> {
    let lookup = match (params.key.as_deref(), params.name.as_deref()) {
        (Some(key), None) => state.resolver.resolve_by_key(key).await,
        (None, Some(name)) => state.resolver.resolve_by_name(name).await,
        _ => return Err(Error::InvalidInput("exactly one of key or name is required".into()).into()),
    };

    let status = match &lookup {
        AuthorLookup::Resolved(_) => "resolved",
        AuthorLookup::Fallback(_) => "fallback",
        AuthorLookup::Absent => "absent",
    };
    let profile = lookup.profile().map(ProfileOutput::from);

    let saved = match (params.save_for_user.as_deref(), lookup.into_profile()) {
        (Some(user_id), Some(profile)) => Some(state.db().create_author(user_id, &profile.into()).await?),
        _ => None,
    };

    json_result(&AuthorLookupOutput { status: status.into(), profile, saved })
}

/// Implementation of the author_create tool.
pub async fn create_impl(db: &LibraryDb, params: AuthorCreateParams) -> Result<CallToolResult, McpError> {
    let author = db.create_author(&params.user_id, &params.author.into()).await?;
    json_result(&AuthorOutput { author })
}

/// Implementation of the author_update tool.
pub async fn update_impl(db: &LibraryDb, params: AuthorUpdateParams) -> Result<CallToolResult, McpError> {
    if !db.update_author(params.id, &params.user_id, &params.author.into()).await? {
        return Err(Error::NotFound(format!("author {} for user {}", params.id, params.user_id)).into());
    }

    let author = db
        .get_author(params.id, &params.user_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("author {} for user {}", params.id, params.user_id)))?;
    json_result(&AuthorOutput { author })
}

/// Implementation of the author_get tool.
pub async fn get_impl(db: &LibraryDb, params: AuthorGetParams) -> Result<CallToolResult, McpError> {
    let author = db
        .get_author(params.id, &params.user_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("author {} for user {}", params.id, params.user_id)))?;
    json_result(&AuthorOutput { author })
}

/// Implementation of the author_list tool.
pub async fn list_impl(db: &LibraryDb, params: AuthorListParams) -> Result<CallToolResult, McpError> {
    if params.user_id.trim().is_empty() {
        return Err(Error::InvalidInput("user_id cannot be empty".into()).into());
    }

    let authors = db.list_authors(&params.user_id).await?;
    json_result(&AuthorListOutput { authors })
}

/// Implementation of the author_delete tool.
pub async fn delete_impl(db: &LibraryDb, params: AuthorDeleteParams) -> Result<CallToolResult, McpError> {
    if !db.delete_author(params.id, &params.user_id).await? {
        return Err(Error::NotFound(format!("author {} for user {}", params.id, params.user_id)).into());
    }

    json_result(&AuthorDeleteOutput { deleted: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{offline_state, text_of};

    #[tokio::test]
    async fn test_lookup_requires_one_input() {
        let state = offline_state().await;

        let err = lookup_impl(&state, AuthorLookupParams::default()).await.unwrap_err();
        assert_eq!(err.code.0, -32602);

        let both = AuthorLookupParams { key: Some("OL1A".into()), name: Some("x".into()), ..Default::default() };
        assert!(lookup_impl(&state, both).await.is_err());
    }

    #[tokio::test]
    async fn test_blank_name_is_absent() {
        let state = offline_state().await;
        let params = AuthorLookupParams { name: Some("  ".into()), save_for_user: Some("alice".into()), ..Default::default() };

        let result = lookup_impl(&state, params).await.unwrap();
        let output: AuthorLookupOutput = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(output.status, "absent");
        assert!(output.profile.is_none());
        assert!(output.saved.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_catalog_falls_back_and_saves() {
        let state = offline_state().await;
        let params = AuthorLookupParams {
            name: Some("Octavia Butler".into()),
            save_for_user: Some("alice".into()),
            ..Default::default()
        };

        let result = lookup_impl(&state, params).await.unwrap();
        let output: AuthorLookupOutput = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(output.status, "fallback");
        assert_eq!(output.profile.unwrap().full_name, "Octavia Butler");

        let saved = output.saved.unwrap();
        let result = list_impl(state.db(), AuthorListParams { user_id: "alice".into() }).await.unwrap();
        let listed: AuthorListOutput = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(listed.authors, vec![saved.clone()]);

        let delete = AuthorDeleteParams { user_id: "alice".into(), id: saved.id };
        assert!(delete_impl(state.db(), delete.clone()).await.is_ok());
        let err = delete_impl(state.db(), delete).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    fn le_guin() -> AuthorFields {
        AuthorFields {
            full_name: "Ursula K. Le Guin".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1929, 10, 21),
            city: Some("Berkeley".into()),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_create_get_update() {
        let state = offline_state().await;

        let create = AuthorCreateParams { user_id: "alice".into(), author: le_guin() };
        let result = create_impl(state.db(), create).await.unwrap();
        let created: AuthorOutput = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(created.author.date_of_birth, NaiveDate::from_ymd_opt(1929, 10, 21));

        let get = AuthorGetParams { user_id: "alice".into(), id: created.author.id };
        let result = get_impl(state.db(), get.clone()).await.unwrap();
        let fetched: AuthorOutput = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(fetched.author, created.author);

        let update = AuthorUpdateParams {
            user_id: "alice".into(),
            id: created.author.id,
            author: AuthorFields { city: Some("Portland".into()), email: Some("ukl@example.com".into()), ..le_guin() },
        };
        let result = update_impl(state.db(), update).await.unwrap();
        let updated: AuthorOutput = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(updated.author.city.as_deref(), Some("Portland"));
        assert_eq!(updated.author.email.as_deref(), Some("ukl@example.com"));

        let other_user = AuthorGetParams { user_id: "bob".into(), ..get };
        let err = get_impl(state.db(), other_user).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_email_and_blank_user() {
        let state = offline_state().await;

        let bad_email = AuthorCreateParams {
            user_id: "alice".into(),
            author: AuthorFields { email: Some("not-an-email".into()), ..le_guin() },
        };
        let err = create_impl(state.db(), bad_email).await.unwrap_err();
        assert_eq!(err.code.0, -32602);

        let blank_user = AuthorCreateParams { user_id: " ".into(), author: le_guin() };
        let err = create_impl(state.db(), blank_user).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_update_missing_author() {
        let state = offline_state().await;

        let update = AuthorUpdateParams { user_id: "alice".into(), id: 42, author: le_guin() };
        let err = update_impl(state.db(), update).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[tokio::test]
    async fn test_lookup_save_for_blank_user_rejected() {
        let state = offline_state().await;
        let params = AuthorLookupParams {
            name: Some("Octavia Butler".into()),
            save_for_user: Some("".into()),
            ..Default::default()
        };

        let err = lookup_impl(&state, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
