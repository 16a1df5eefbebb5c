//! OpenLibrary client error types.

use std::sync::Arc;

/// Errors from the OpenLibrary catalog client.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Non-success HTTP response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { CatalogError::Timeout } else { CatalogError::Network(Arc::new(err)) }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}
