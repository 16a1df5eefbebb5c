//! Best-effort author enrichment.
//!
//! Resolution never returns an error. `resolve_by_key` answers `Absent` when
//! the catalog rejects the key and a name-only fallback on any other failure.
//! `resolve_by_name` always produces a profile for a non-blank name, falling
//! back to the input name when the catalog is unavailable or has no match.

pub mod dates;

pub use dates::parse_birth_date;

use crate::openlibrary::{AuthorDetail, Catalog, CatalogError};
use chrono::NaiveDate;
use libris_core::NewAuthor;
use serde::Serialize;
use std::sync::Arc;

const AUTHORS_PREFIX: &str = "/authors/";

/// Resolved author information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorProfile {
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub city: Option<String>,
}

impl AuthorProfile {
    /// A profile carrying only a name.
    pub fn named(full_name: impl Into<String>) -> Self {
        Self { full_name: full_name.into(), date_of_birth: None, city: None }
    }

    fn from_detail(detail: &AuthorDetail, fallback_name: &str) -> Self {
        let full_name = detail
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(fallback_name);

        Self {
            full_name: full_name.to_string(),
            date_of_birth: detail.birth_date.as_deref().and_then(parse_birth_date),
            city: detail.city().map(str::to_string),
        }
    }
}

impl From<AuthorProfile> for NewAuthor {
    fn from(profile: AuthorProfile) -> Self {
        NewAuthor { full_name: profile.full_name, date_of_birth: profile.date_of_birth, city: profile.city, email: None }
    }
}

/// Outcome of an author lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "profile", rename_all = "snake_case")]
pub enum AuthorLookup {
    /// The catalog answered; the profile holds what it knew.
    Resolved(AuthorProfile),
    /// Enrichment failed; the profile holds only the best-known name.
    Fallback(AuthorProfile),
    /// No profile.
    Absent,
}

impl AuthorLookup {
    pub fn profile(&self) -> Option<&AuthorProfile> {
        match self {
            AuthorLookup::Resolved(profile) | AuthorLookup::Fallback(profile) => Some(profile),
            AuthorLookup::Absent => None,
        }
    }

    pub fn into_profile(self) -> Option<AuthorProfile> {
        match self {
            AuthorLookup::Resolved(profile) | AuthorLookup::Fallback(profile) => Some(profile),
            AuthorLookup::Absent => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AuthorLookup::Fallback(_))
    }
}

/// Shape an author key as a detail path.
///
/// `/authors/...` is kept, a bare `OL...` id is wrapped, anything else is
/// returned unchanged.
pub fn normalize_author_key(key: &str) -> String {
    if key.starts_with(AUTHORS_PREFIX) {
        key.to_string()
    } else if key.starts_with("OL") {
        format!("{AUTHORS_PREFIX}{key}")
    } else {
        key.to_string()
    }
}

/// Resolves author names and keys to profiles through the catalog.
#[derive(Clone)]
pub struct AuthorResolver {
    catalog: Arc<dyn Catalog>,
}

impl AuthorResolver {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Resolve an external author key with a single detail request.
    pub async fn resolve_by_key(&self, key: &str) -> AuthorLookup {
        if key.trim().is_empty() {
            return AuthorLookup::Absent;
        }

        let path = normalize_author_key(key);
        match self.catalog.author_detail(&path).await {
            Ok(detail) => AuthorLookup::Resolved(AuthorProfile::from_detail(&detail, key)),
            Err(CatalogError::HttpError { status }) => {
                tracing::debug!(key, status, "author key not resolvable");
                AuthorLookup::Absent
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to fetch author details by key");
                AuthorLookup::Fallback(AuthorProfile::named(key))
            }
        }
    }

    /// Resolve a free-text author name: search, then enrich the first match.
    pub async fn resolve_by_name(&self, name: &str) -> AuthorLookup {
        if name.trim().is_empty() {
            return AuthorLookup::Absent;
        }

        match self.lookup_name(name).await {
            Ok(lookup) => lookup,
            Err(e) => {
                tracing::warn!(name, error = %e, "failed to fetch author details by name");
                AuthorLookup::Fallback(AuthorProfile::named(name))
            }
        }
    }

    async fn lookup_name(&self, name: &str) -> Result<AuthorLookup, CatalogError> {
        let matches = match self.catalog.search_authors(name).await {
            Ok(matches) => matches,
            Err(CatalogError::HttpError { status }) => {
                tracing::debug!(name, status, "author search unavailable");
                return Ok(AuthorLookup::Fallback(AuthorProfile::named(name)));
            }
            Err(e) => return Err(e),
        };

        let Some(first) = matches.into_iter().next() else {
            tracing::debug!(name, "no author matches");
            return Ok(AuthorLookup::Fallback(AuthorProfile::named(name)));
        };

        let matched_name = first
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(name);
        let mut profile = AuthorProfile::named(matched_name);

        if let Some(key) = first.key.as_deref().filter(|k| !k.trim().is_empty()) {
            match self.catalog.author_detail(&normalize_author_key(key)).await {
                Ok(detail) => {
                    profile.date_of_birth = detail.birth_date.as_deref().and_then(parse_birth_date);
                    profile.city = detail.city().map(str::to_string);
                }
                Err(CatalogError::HttpError { status }) => {
                    tracing::debug!(name, key, status, "author details unavailable; keeping matched name");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(AuthorLookup::Resolved(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openlibrary::AuthorMatch;
    use crate::testing::{FakeCatalog, Reply};

    fn detail(name: Option<&str>, birth_date: Option<&str>, birth_place: Option<&str>) -> AuthorDetail {
        AuthorDetail {
            name: name.map(str::to_string),
            birth_date: birth_date.map(str::to_string),
            birth_place: birth_place.map(str::to_string),
            ..Default::default()
        }
    }

    fn resolver(fake: &Arc<FakeCatalog>) -> AuthorResolver {
        AuthorResolver::new(fake.clone())
    }

    #[test]
    fn test_normalize_author_key() {
        assert_eq!(normalize_author_key("OL123A"), "/authors/OL123A");
        assert_eq!(normalize_author_key("/authors/OL123A"), "/authors/OL123A");
        assert_eq!(normalize_author_key("tolkien"), "tolkien");
    }

    #[tokio::test]
    async fn test_resolve_by_key() {
        let fake = Arc::new(FakeCatalog::default());
        fake.set_detail("/authors/OL123A", Reply::Ok(detail(Some("J. Author"), Some("1920-01-01"), Some("London"))));

        let lookup = resolver(&fake).resolve_by_key("OL123A").await;

        assert_eq!(
            lookup,
            AuthorLookup::Resolved(AuthorProfile {
                full_name: "J. Author".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1920, 1, 1),
                city: Some("London".into()),
            })
        );
        assert_eq!(fake.calls(), vec!["detail:/authors/OL123A".to_string()]);
    }

    #[tokio::test]
    async fn test_resolve_by_key_without_name_uses_key() {
        let fake = Arc::new(FakeCatalog::default());
        fake.set_detail("/authors/OL9A", Reply::Ok(detail(None, Some("sometime"), None)));

        let profile = resolver(&fake).resolve_by_key("/authors/OL9A").await.into_profile().unwrap();
        assert_eq!(profile, AuthorProfile::named("/authors/OL9A"));
    }

    #[tokio::test]
    async fn test_resolve_by_key_not_found_is_absent() {
        let fake = Arc::new(FakeCatalog::default());
        let lookup = resolver(&fake).resolve_by_key("OL404A").await;
        assert_eq!(lookup, AuthorLookup::Absent);
    }

    #[tokio::test]
    async fn test_resolve_by_key_failure_falls_back() {
        let fake = Arc::new(FakeCatalog::default());
        fake.set_detail("/authors/OL1A", Reply::Malformed);
        fake.set_detail("/authors/OL2A", Reply::Timeout);

        let lookup = resolver(&fake).resolve_by_key("OL1A").await;
        assert_eq!(lookup, AuthorLookup::Fallback(AuthorProfile::named("OL1A")));

        let lookup = resolver(&fake).resolve_by_key("OL2A").await;
        assert!(lookup.is_fallback());
    }

    #[tokio::test]
    async fn test_blank_inputs_are_absent() {
        let fake = Arc::new(FakeCatalog::default());
        assert_eq!(resolver(&fake).resolve_by_key("  ").await, AuthorLookup::Absent);
        assert_eq!(resolver(&fake).resolve_by_name("").await, AuthorLookup::Absent);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_by_name_enriches_first_match() {
        let fake = Arc::new(FakeCatalog::default());
        fake.set_author_search(Reply::Ok(vec![
            AuthorMatch { name: Some("J. R. R. Tolkien".into()), key: Some("OL26320A".into()) },
            AuthorMatch { name: Some("Christopher Tolkien".into()), key: Some("OL1A".into()) },
        ]));
        let mut tolkien = detail(Some("John Ronald Reuel Tolkien"), Some("3 January 1892"), None);
        tolkien.location = Some("Bloemfontein".into());
        fake.set_detail("/authors/OL26320A", Reply::Ok(tolkien));

        let lookup = resolver(&fake).resolve_by_name("tolkien").await;

        assert_eq!(
            lookup,
            AuthorLookup::Resolved(AuthorProfile {
                full_name: "J. R. R. Tolkien".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1892, 1, 3),
                city: Some("Bloemfontein".into()),
            })
        );
        assert_eq!(fake.calls(), vec!["authors:tolkien".to_string(), "detail:/authors/OL26320A".to_string()]);
    }

    #[tokio::test]
    async fn test_resolve_by_name_no_matches() {
        let fake = Arc::new(FakeCatalog::default());
        let lookup = resolver(&fake).resolve_by_name("Nobody Atall").await;
        assert_eq!(lookup, AuthorLookup::Fallback(AuthorProfile::named("Nobody Atall")));
    }

    #[tokio::test]
    async fn test_resolve_by_name_search_unavailable() {
        let fake = Arc::new(FakeCatalog::default());
        fake.set_author_search(Reply::Status(500));

        let lookup = resolver(&fake).resolve_by_name("Le Guin").await;
        assert_eq!(lookup, AuthorLookup::Fallback(AuthorProfile::named("Le Guin")));
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_by_name_missing_details_keeps_match() {
        let fake = Arc::new(FakeCatalog::default());
        fake.set_author_search(Reply::Ok(vec![AuthorMatch {
            name: Some("Ursula K. Le Guin".into()),
            key: Some("/authors/OL2A".into()),
        }]));

        let lookup = resolver(&fake).resolve_by_name("le guin").await;
        assert_eq!(lookup, AuthorLookup::Resolved(AuthorProfile::named("Ursula K. Le Guin")));
    }

    #[tokio::test]
    async fn test_resolve_by_name_detail_failure_falls_back_to_input() {
        let fake = Arc::new(FakeCatalog::default());
        fake.set_author_search(Reply::Ok(vec![AuthorMatch { name: Some("Matched".into()), key: Some("OL5A".into()) }]));
        fake.set_detail("/authors/OL5A", Reply::Timeout);

        let lookup = resolver(&fake).resolve_by_name("input").await;
        assert_eq!(lookup, AuthorLookup::Fallback(AuthorProfile::named("input")));
    }

    #[tokio::test]
    async fn test_resolve_by_name_match_without_key() {
        let fake = Arc::new(FakeCatalog::default());
        fake.set_author_search(Reply::Ok(vec![AuthorMatch { name: None, key: None }]));

        let lookup = resolver(&fake).resolve_by_name("Anonymous").await;
        assert_eq!(lookup, AuthorLookup::Resolved(AuthorProfile::named("Anonymous")));
        assert_eq!(fake.calls().len(), 1);
    }

    #[test]
    fn test_profile_into_new_author() {
        let author: NewAuthor = AuthorProfile { city: Some("Oxford".into()), ..AuthorProfile::named("A") }.into();
        assert_eq!(author.full_name, "A");
        assert_eq!(author.city.as_deref(), Some("Oxford"));
        assert!(author.email.is_none());
    }
}
