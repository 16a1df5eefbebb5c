//! Client code for libris.
//!
//! This crate provides the OpenLibrary catalog client, the cached search
//! aggregator, author resolution and the library workflow shared by the
//! server.

pub mod authors;
pub mod library;
pub mod openlibrary;
pub mod search;

#[cfg(test)]
mod testing;

pub use authors::{AuthorLookup, AuthorProfile, AuthorResolver, normalize_author_key, parse_birth_date};
pub use library::{AddBookOutcome, AuthorEnrichment, Library, favorite_from_document};
pub use openlibrary::{
    AdvancedQuery, Catalog, CatalogError, CatalogQuery, Document, OpenLibraryClient, OpenLibraryConfig, SearchType,
    cover_image_url,
};
pub use search::{Degradation, ResultSource, SearchOutcome, SearchService};
