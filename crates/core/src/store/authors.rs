//! Private author records.

use super::connection::LibraryDb;
use crate::Error;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An author saved to a user's private list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Author {
    pub id: i64,
    pub user_id: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub city: Option<String>,
    pub email: Option<String>,
}

/// Author fields supplied on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub city: Option<String>,
    pub email: Option<String>,
}

impl NewAuthor {
    fn validate(&self) -> Result<(), Error> {
        if self.full_name.trim().is_empty() {
            return Err(Error::InvalidInput("full_name cannot be empty".into()));
        }
        if let Some(email) = &self.email
            && !email.contains('@')
        {
            return Err(Error::InvalidInput(format!("invalid email: {email}")));
        }
        Ok(())
    }
}

/// Matching key for author names: trimmed and lowercased with Unicode rules.
fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn row_to_author(row: &rusqlite::Row<'_>) -> rusqlite::Result<Author> {
    let date_of_birth: Option<String> = row.get(3)?;
    Ok(Author {
        id: row.get(0)?,
        user_id: row.get(1)?,
        full_name: row.get(2)?,
        date_of_birth: date_of_birth.and_then(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).ok()),
        city: row.get(4)?,
        email: row.get(5)?,
    })
}

impl LibraryDb {
    /// Save an author to a user's list.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for a blank user id, a blank name or a
    /// malformed email.
    pub async fn create_author(&self, user_id: &str, author: &NewAuthor) -> Result<Author, Error> {
        if user_id.trim().is_empty() {
            return Err(Error::InvalidInput("user_id cannot be empty".into()));
        }
        author.validate()?;
        let user_id = user_id.to_string();
        let author = author.clone();
        let key = name_key(&author.full_name);

        self.conn
            .call(move |conn| -> Result<Author, Error> {
                conn.execute(
                    "INSERT INTO authors (user_id, full_name, name_key, date_of_birth, city, email)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        user_id,
                        author.full_name,
                        key,
                        author.date_of_birth.map(|d| d.format(DATE_FORMAT).to_string()),
                        author.city,
                        author.email,
                    ],
                )?;

                Ok(Author {
                    id: conn.last_insert_rowid(),
                    user_id,
                    full_name: author.full_name,
                    date_of_birth: author.date_of_birth,
                    city: author.city,
                    email: author.email,
                })
            })
            .await
            .map_err(Error::from)
    }

    /// List a user's authors ordered by name.
    pub async fn list_authors(&self, user_id: &str) -> Result<Vec<Author>, Error> {
        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<Author>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, full_name, date_of_birth, city, email FROM authors
                    WHERE user_id = ?1 ORDER BY full_name COLLATE NOCASE, id",
                )?;
                let rows = stmt.query_map(params![user_id], row_to_author)?;
                rows.collect::<Result<Vec<_>, _>>().map_err(Error::from)
            })
            .await
            .map_err(Error::from)
    }

    /// Get one of a user's authors by id.
    pub async fn get_author(&self, id: i64, user_id: &str) -> Result<Option<Author>, Error> {
        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| -> Result<Option<Author>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, full_name, date_of_birth, city, email FROM authors
                    WHERE id = ?1 AND user_id = ?2",
                )?;
                match stmt.query_row(params![id, user_id], row_to_author) {
                    Ok(author) => Ok(Some(author)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Find a user's author by name, ignoring case (including non-ASCII
    /// letters) and surrounding whitespace.
    pub async fn find_author_by_name(&self, user_id: &str, name: &str) -> Result<Option<Author>, Error> {
        let user_id = user_id.to_string();
        let key = name_key(name);
        self.conn
            .call(move |conn| -> Result<Option<Author>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, full_name, date_of_birth, city, email FROM authors
                    WHERE user_id = ?1 AND name_key = ?2 ORDER BY id LIMIT 1",
                )?;
                match stmt.query_row(params![user_id, key], row_to_author) {
                    Ok(author) => Ok(Some(author)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Replace the fields of one of a user's authors.
    ///
    /// Returns whether a row was updated.
    pub async fn update_author(&self, id: i64, user_id: &str, author: &NewAuthor) -> Result<bool, Error> {
        author.validate()?;
        let user_id = user_id.to_string();
        let author = author.clone();
        let key = name_key(&author.full_name);
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute(
                    "UPDATE authors SET full_name = ?1, name_key = ?2, date_of_birth = ?3, city = ?4, email = ?5
                    WHERE id = ?6 AND user_id = ?7",
                    params![
                        author.full_name,
                        key,
                        author.date_of_birth.map(|d| d.format(DATE_FORMAT).to_string()),
                        author.city,
                        author.email,
                        id,
                        user_id,
                    ],
                )?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete one of a user's authors.
    pub async fn delete_author(&self, id: i64, user_id: &str) -> Result<bool, Error> {
        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM authors WHERE id = ?1 AND user_id = ?2", params![id, user_id])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }
}
