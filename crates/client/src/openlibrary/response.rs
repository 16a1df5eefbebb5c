//! OpenLibrary response types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Template base for derived cover image URLs.
const COVERS_BASE_URL: &str = "https://covers.openlibrary.org/b/id";

/// Medium-size cover image URL for a cover id.
pub fn cover_image_url(cover_id: i64) -> String {
    format!("{COVERS_BASE_URL}/{cover_id}-M.jpg")
}

/// Raw response from `search.json`.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub docs: Vec<Document>,
}

/// A search result document.
///
/// Fields the catalog returns beyond the modelled ones are kept in `extra`
/// and survive a round trip through the search cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<Vec<String>>,

    /// 0 when the catalog has no year.
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_publish_year: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_i: Option<i64>,

    /// Work key, e.g. `/works/OL27448W`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Derived cover image URL; never stored.
    pub fn cover_image_url(&self) -> Option<String> {
        self.cover_i.map(cover_image_url)
    }

    /// First listed author, if any.
    pub fn primary_author(&self) -> Option<&str> {
        self.author_name.as_ref()?.first().map(String::as_str)
    }
}

/// Raw response from `search/authors.json`.
#[derive(Debug, Deserialize)]
pub struct AuthorSearchPage {
    #[serde(default)]
    pub docs: Vec<AuthorMatch>,
}

/// An author search hit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthorMatch {
    #[serde(default, deserialize_with = "string_only")]
    pub name: Option<String>,
    /// Author key; bare (`OL23919A`) or path-shaped (`/authors/OL23919A`).
    #[serde(default, deserialize_with = "string_only")]
    pub key: Option<String>,
}

/// Raw response from `/authors/{id}.json`.
///
/// Non-string values in these fields are ignored rather than failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthorDetail {
    #[serde(default, deserialize_with = "string_only")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_only")]
    pub birth_date: Option<String>,
    #[serde(default, deserialize_with = "string_only")]
    pub birth_place: Option<String>,
    #[serde(default, deserialize_with = "string_only")]
    pub birthplace: Option<String>,
    #[serde(default, deserialize_with = "string_only")]
    pub location: Option<String>,
}

impl AuthorDetail {
    /// First non-empty of `birth_place`, `birthplace`, `location`.
    pub fn city(&self) -> Option<&str> {
        [&self.birth_place, &self.birthplace, &self.location]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .map(str::trim)
            .find(|v| !v.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}
