//! OpenLibrary catalog client.
//!
//! ### Endpoints
//!
//! - **Search**: `GET {base}/search.json?{field}={query}`
//! - **Author search**: `GET {base}/search/authors.json?q={name}`
//! - **Author detail**: `GET {base}/authors/{id}.json`
//!
//! Query values are URL-encoded. Every request is bounded by the configured
//! timeout; there is no retry or backoff.

pub mod error;
pub mod request;
pub mod response;

pub use error::CatalogError;
pub use request::{AdvancedQuery, CatalogQuery, SearchType};
pub use response::{AuthorDetail, AuthorMatch, AuthorSearchPage, Document, SearchPage, cover_image_url};

use libris_core::AppConfig;
use reqwest::header;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default base URL for the OpenLibrary API.
const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "libris/0.1";

/// The remote catalog used by search and author resolution.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Run a book search and return the documents in catalog order.
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<Document>, CatalogError>;

    /// Search authors by name.
    async fn search_authors(&self, name: &str) -> Result<Vec<AuthorMatch>, CatalogError>;

    /// Fetch an author record by path (e.g. `/authors/OL23919A`).
    async fn author_detail(&self, path: &str) -> Result<AuthorDetail, CatalogError>;
}

/// OpenLibrary client configuration.
#[derive(Debug, Clone)]
pub struct OpenLibraryConfig {
    /// Base URL (default: https://openlibrary.org).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: libris/0.x).
    pub user_agent: String,
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for OpenLibraryConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.catalog_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// OpenLibrary HTTP client.
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    config: OpenLibraryConfig,
}

impl OpenLibraryClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OpenLibraryConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| CatalogError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn search_url(&self) -> String {
        format!("{}/search.json", self.base())
    }

    fn author_search_url(&self) -> String {
        format!("{}/search/authors.json", self.base())
    }

    fn author_detail_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}.json", self.base(), path)
        } else {
            format!("{}/{}.json", self.base(), path)
        }
    }

    /// GET a JSON document, mapping non-success status and bad bodies to errors.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(String, String)]) -> Result<T, CatalogError> {
        let start = Instant::now();

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(url, %status, "catalog response");

        if !status.is_success() {
            return Err(CatalogError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        let parsed = serde_json::from_slice(&bytes)?;

        tracing::debug!(url, elapsed = ?start.elapsed(), "catalog request completed");
        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl Catalog for OpenLibraryClient {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<Document>, CatalogError> {
        tracing::debug!(query = %query.composed(), "searching catalog");
        let page: SearchPage = self.get_json(&self.search_url(), query.pairs()).await?;
        Ok(page.docs)
    }

    async fn search_authors(&self, name: &str) -> Result<Vec<AuthorMatch>, CatalogError> {
        let query = [("q".to_string(), name.to_string())];
        let page: AuthorSearchPage = self.get_json(&self.author_search_url(), &query).await?;
        Ok(page.docs)
    }

    async fn author_detail(&self, path: &str) -> Result<AuthorDetail, CatalogError> {
        self.get_json(&self.author_detail_url(path), &[]).await
    }
}
