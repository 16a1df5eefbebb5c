//! SQLite-backed store for the search cache, favorites and private authors.
//!
//! This module provides persistent storage using SQLite with async access via
//! tokio-rusqlite. It supports:
//!
//! - A search cache keyed by the exact query string (upsert semantics)
//! - Per-user favorite books with a cap and de-duplication
//! - Per-user author records
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod authors;
pub mod connection;
pub mod favorites;
pub mod migrations;
pub mod search;

pub use crate::Error;

pub use authors::{Author, NewAuthor};
pub use connection::LibraryDb;
pub use favorites::{FavoriteAdd, FavoriteBook, NewFavorite};
pub use search::{SearchCacheEntry, SearchCacheStore};
