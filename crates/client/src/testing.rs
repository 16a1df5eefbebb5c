//! Scripted catalog for unit tests.

use crate::openlibrary::{AuthorDetail, AuthorMatch, Catalog, CatalogError, CatalogQuery, Document};
use std::collections::HashMap;
use std::sync::Mutex;

/// A scripted catalog reply.
#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
    Ok(T),
    Status(u16),
    Timeout,
    Malformed,
}

impl<T: Clone> Reply<T> {
    fn to_result(&self) -> Result<T, CatalogError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Status(status) => Err(CatalogError::HttpError { status: *status }),
            Reply::Timeout => Err(CatalogError::Timeout),
            Reply::Malformed => Err(CatalogError::Parse("expected value at line 1 column 1".into())),
        }
    }
}

pub(crate) fn doc(title: &str) -> Document {
    Document {
        title: title.to_string(),
        author_name: Some(vec!["Test Author".to_string()]),
        first_publish_year: 2000,
        cover_i: None,
        key: Some(format!("/works/{}", title.replace(' ', "_"))),
        extra: Default::default(),
    }
}

pub(crate) fn docs(n: usize) -> Vec<Document> {
    (0..n).map(|i| doc(&format!("Book {i}"))).collect()
}

/// Catalog fake that records every call.
pub(crate) struct FakeCatalog {
    search_reply: Mutex<Reply<Vec<Document>>>,
    author_search_reply: Mutex<Reply<Vec<AuthorMatch>>>,
    details: Mutex<HashMap<String, Reply<AuthorDetail>>>,
    calls: Mutex<Vec<String>>,
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self {
            search_reply: Mutex::new(Reply::Ok(Vec::new())),
            author_search_reply: Mutex::new(Reply::Ok(Vec::new())),
            details: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeCatalog {
    pub(crate) fn with_search(reply: Reply<Vec<Document>>) -> Self {
        let fake = Self::default();
        fake.set_search(reply);
        fake
    }

    pub(crate) fn set_search(&self, reply: Reply<Vec<Document>>) {
        *self.search_reply.lock().unwrap() = reply;
    }

    pub(crate) fn set_author_search(&self, reply: Reply<Vec<AuthorMatch>>) {
        *self.author_search_reply.lock().unwrap() = reply;
    }

    pub(crate) fn set_detail(&self, path: &str, reply: Reply<AuthorDetail>) {
        self.details.lock().unwrap().insert(path.to_string(), reply);
    }

    /// Every call as `search:{composed}`, `authors:{name}` or `detail:{path}`.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn search_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("search:")).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl Catalog for FakeCatalog {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<Document>, CatalogError> {
        self.record(format!("search:{}", query.composed()));
        self.search_reply.lock().unwrap().to_result()
    }

    async fn search_authors(&self, name: &str) -> Result<Vec<AuthorMatch>, CatalogError> {
        self.record(format!("authors:{name}"));
        self.author_search_reply.lock().unwrap().to_result()
    }

    async fn author_detail(&self, path: &str) -> Result<AuthorDetail, CatalogError> {
        self.record(format!("detail:{path}"));
        self.details
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or(Reply::Status(404))
            .to_result()
    }
}
