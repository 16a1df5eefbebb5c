//! Core types and shared functionality for libris.
//!
//! This crate provides:
//! - SQLite store for the search cache, favorites and authors
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod store;

pub use config::{AppConfig, ConfigError, MAX_SEARCH_RESULTS};
pub use error::Error;
pub use store::{
    Author, FavoriteAdd, FavoriteBook, LibraryDb, NewAuthor, NewFavorite, SearchCacheEntry, SearchCacheStore,
};
