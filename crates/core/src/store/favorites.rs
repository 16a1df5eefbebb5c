//! Favorite book operations.
//!
//! Each user keeps a private list of favorite books, capped at a configurable
//! limit and de-duplicated by OpenLibrary id.

use super::connection::LibraryDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A saved favorite book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FavoriteBook {
    pub id: i64,
    pub user_id: String,
    pub open_library_id: String,
    pub title: String,
    pub author: String,
    pub cover_id: Option<i64>,
    pub first_publish_year: Option<i32>,
    pub cover_image_url: Option<String>,
    pub created_at: String,
}

/// A favorite book to be saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFavorite {
    pub open_library_id: String,
    pub title: String,
    pub author: String,
    pub cover_id: Option<i64>,
    pub first_publish_year: Option<i32>,
    pub cover_image_url: Option<String>,
}

/// Result of adding a favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteAdd {
    /// The book was inserted.
    Added(FavoriteBook),
    /// The user already had this book; nothing was written.
    AlreadyPresent(FavoriteBook),
}

impl FavoriteAdd {
    pub fn book(&self) -> &FavoriteBook {
        match self {
            FavoriteAdd::Added(book) | FavoriteAdd::AlreadyPresent(book) => book,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, FavoriteAdd::Added(_))
    }
}

const SELECT_COLUMNS: &str = "SELECT id, user_id, open_library_id, title, author, cover_id, first_publish_year,
    cover_image_url, created_at FROM favorite_books";

fn row_to_favorite(row: &rusqlite::Row<'_>) -> rusqlite::Result<FavoriteBook> {
    Ok(FavoriteBook {
        id: row.get(0)?,
        user_id: row.get(1)?,
        open_library_id: row.get(2)?,
        title: row.get(3)?,
        author: row.get(4)?,
        cover_id: row.get(5)?,
        first_publish_year: row.get(6)?,
        cover_image_url: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn find_by_open_library_id(
    conn: &rusqlite::Connection, user_id: &str, open_library_id: &str,
) -> Result<Option<FavoriteBook>, Error> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE user_id = ?1 AND open_library_id = ?2"))?;
    match stmt.query_row(params![user_id, open_library_id], row_to_favorite) {
        Ok(book) => Ok(Some(book)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl LibraryDb {
    /// Add a favorite book for a user.
    ///
    /// A book the user already saved is returned as `AlreadyPresent` without
    /// counting against the cap. Otherwise the cap is checked before inserting.
    ///
    /// # Errors
    ///
    /// Returns `Error::CapacityExceeded` when the user already holds `limit`
    /// favorites, and `Error::InvalidInput` when the id or title is blank.
    pub async fn add_favorite(&self, user_id: &str, book: &NewFavorite, limit: usize) -> Result<FavoriteAdd, Error> {
        if user_id.trim().is_empty() {
            return Err(Error::InvalidInput("user_id cannot be empty".into()));
        }
        if book.open_library_id.trim().is_empty() || book.title.trim().is_empty() {
            return Err(Error::InvalidInput("open_library_id and title are required".into()));
        }

        let user_id = user_id.to_string();
        let book = book.clone();
        let created_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<FavoriteAdd, Error> {
                let tx = conn.transaction()?;

                if let Some(existing) = find_by_open_library_id(&tx, &user_id, &book.open_library_id)? {
                    return Ok(FavoriteAdd::AlreadyPresent(existing));
                }

                let count: i64 =
                    tx.query_row("SELECT COUNT(*) FROM favorite_books WHERE user_id = ?1", params![user_id], |row| {
                        row.get(0)
                    })?;
                if count as usize >= limit {
                    return Err(Error::CapacityExceeded { limit });
                }

                tx.execute(
                    "INSERT INTO favorite_books (
                        user_id, open_library_id, title, author, cover_id, first_publish_year,
                        cover_image_url, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        user_id,
                        book.open_library_id,
                        book.title,
                        book.author,
                        book.cover_id,
                        book.first_publish_year,
                        book.cover_image_url,
                        created_at,
                    ],
                )?;

                let added = FavoriteBook {
                    id: tx.last_insert_rowid(),
                    user_id,
                    open_library_id: book.open_library_id,
                    title: book.title,
                    author: book.author,
                    cover_id: book.cover_id,
                    first_publish_year: book.first_publish_year,
                    cover_image_url: book.cover_image_url,
                    created_at,
                };
                tx.commit()?;

                Ok(FavoriteAdd::Added(added))
            })
            .await
            .map_err(Error::from)
    }

    /// List a user's favorites in insertion order.
    pub async fn list_favorites(&self, user_id: &str) -> Result<Vec<FavoriteBook>, Error> {
        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<FavoriteBook>, Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE user_id = ?1 ORDER BY id"))?;
                let rows = stmt.query_map(params![user_id], row_to_favorite)?;
                rows.collect::<Result<Vec<_>, _>>().map_err(Error::from)
            })
            .await
            .map_err(Error::from)
    }

    /// Get one of a user's favorites by id.
    ///
    /// Returns None when the id does not exist or belongs to another user.
    pub async fn get_favorite(&self, id: i64, user_id: &str) -> Result<Option<FavoriteBook>, Error> {
        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| -> Result<Option<FavoriteBook>, Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1 AND user_id = ?2"))?;
                match stmt.query_row(params![id, user_id], row_to_favorite) {
                    Ok(book) => Ok(Some(book)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Remove one of a user's favorites.
    ///
    /// Returns whether a row was deleted.
    pub async fn remove_favorite(&self, id: i64, user_id: &str) -> Result<bool, Error> {
        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count =
                    conn.execute("DELETE FROM favorite_books WHERE id = ?1 AND user_id = ?2", params![id, user_id])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }
}
