//! Shared services behind the tool handlers.

use libris_client::{AuthorResolver, Catalog, Library, OpenLibraryClient, OpenLibraryConfig, SearchService};
use libris_core::{AppConfig, LibraryDb};
use std::sync::Arc;

/// Services built once at startup and shared by every tool call.
#[derive(Clone)]
pub struct AppState {
    pub search: SearchService,
    pub resolver: AuthorResolver,
    pub library: Library,
}

impl AppState {
    /// Wire the catalog client, the store and the services from configuration.
    pub fn from_config(config: &AppConfig, db: LibraryDb) -> anyhow::Result<Self> {
        let client = OpenLibraryClient::new(OpenLibraryConfig::from(config))?;
        Ok(Self::with_catalog(config, db, Arc::new(client)))
    }

    pub fn with_catalog(config: &AppConfig, db: LibraryDb, catalog: Arc<dyn Catalog>) -> Self {
        let search = SearchService::from_config(catalog.clone(), Arc::new(db.clone()), config);
        let resolver = AuthorResolver::new(catalog);
        let library = Library::new(db, resolver.clone(), config.favorites_limit);
        Self { search, resolver, library }
    }

    pub fn db(&self) -> &LibraryDb {
        self.library.db()
    }
}
