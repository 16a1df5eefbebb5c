//! Adding books to a user's library.
//!
//! Saving a favorite also records its author in the user's private author
//! list the first time that author appears. Author enrichment is best effort
//! and never fails the book add.

use crate::authors::AuthorResolver;
use crate::openlibrary::Document;
use libris_core::{Author, Error, FavoriteAdd, LibraryDb, NewAuthor, NewFavorite};
use serde::Serialize;

/// What happened to the book's author during an add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "author", rename_all = "snake_case")]
pub enum AuthorEnrichment {
    /// The user already had this author.
    Existing(Author),
    /// The author was resolved and saved.
    Created(Author),
    /// Nothing was saved (duplicate book, blank author, no profile, or a store error).
    Skipped,
}

/// Result of [`Library::add_book`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddBookOutcome {
    pub favorite: FavoriteAdd,
    pub author: AuthorEnrichment,
}

/// Build a favorite from a search document.
///
/// Returns None when the document has no work key to identify it.
pub fn favorite_from_document(doc: &Document) -> Option<NewFavorite> {
    let open_library_id = doc.key.clone().filter(|k| !k.is_empty())?;
    Some(NewFavorite {
        open_library_id,
        title: doc.title.clone(),
        author: doc.primary_author().unwrap_or_default().to_string(),
        cover_id: doc.cover_i,
        first_publish_year: (doc.first_publish_year != 0).then_some(doc.first_publish_year),
        cover_image_url: doc.cover_image_url(),
    })
}

/// A user's favorites and authors, with author enrichment.
#[derive(Clone)]
pub struct Library {
    db: LibraryDb,
    resolver: AuthorResolver,
    favorites_limit: usize,
}

impl Library {
    pub fn new(db: LibraryDb, resolver: AuthorResolver, favorites_limit: usize) -> Self {
        Self { db, resolver, favorites_limit }
    }

    pub fn db(&self) -> &LibraryDb {
        &self.db
    }

    /// Save a favorite book and make sure its author is in the user's list.
    ///
    /// # Errors
    ///
    /// Propagates favorites errors, notably `Error::CapacityExceeded`.
    pub async fn add_book(&self, user_id: &str, book: &NewFavorite) -> Result<AddBookOutcome, Error> {
        let favorite = self.db.add_favorite(user_id, book, self.favorites_limit).await?;

        let author = if favorite.is_new() {
            self.ensure_author(user_id, &book.author).await
        } else {
            AuthorEnrichment::Skipped
        };

        Ok(AddBookOutcome { favorite, author })
    }

    async fn ensure_author(&self, user_id: &str, name: &str) -> AuthorEnrichment {
        if name.trim().is_empty() {
            return AuthorEnrichment::Skipped;
        }

        match self.db.find_author_by_name(user_id, name).await {
            Ok(Some(existing)) => return AuthorEnrichment::Existing(existing),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(user_id, author = name, error = %e, "author lookup failed; skipping enrichment");
                return AuthorEnrichment::Skipped;
            }
        }

        let lookup = self.resolver.resolve_by_name(name).await;
        if lookup.is_fallback() {
            tracing::debug!(author = name, "saving author without catalog details");
        }
        let Some(profile) = lookup.into_profile() else {
            return AuthorEnrichment::Skipped;
        };

        // the stored name is the one on the book so later adds find it
        let author = NewAuthor { full_name: name.trim().to_string(), ..NewAuthor::from(profile) };
        match self.db.create_author(user_id, &author).await {
            Ok(created) => AuthorEnrichment::Created(created),
            Err(e) => {
                tracing::warn!(user_id, author = name, error = %e, "failed to save author");
                AuthorEnrichment::Skipped
            }
        }
    }
}
