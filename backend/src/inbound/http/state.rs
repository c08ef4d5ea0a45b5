//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AuthGateway, PlantCatalog, ProfileDirectory};
use crate::domain::PageRegistry;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthGateway>,
    pub catalog: Arc<dyn PlantCatalog>,
    pub directory: Arc<dyn ProfileDirectory>,
    pub pages: Arc<PageRegistry>,
}

impl HttpState {
    /// Construct state over the given port implementations.
    ///
    /// The page registry is built over the same directory the handlers use,
    /// so open directory pages and per-request session resolution observe one
    /// backend.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use harvestworld::domain::ports::{
    ///     FixtureAuthGateway, FixturePlantCatalog, FixtureProfileDirectory,
    /// };
    /// use harvestworld::inbound::http::state::HttpState;
    ///
    /// let directory = FixtureProfileDirectory::new();
    /// let state = HttpState::new(
    ///     Arc::new(FixtureAuthGateway::new(directory.clone(), "berkebun123")),
    ///     Arc::new(FixturePlantCatalog::default()),
    ///     Arc::new(directory),
    /// );
    /// let _catalog = state.catalog.clone();
    /// ```
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        catalog: Arc<dyn PlantCatalog>,
        directory: Arc<dyn ProfileDirectory>,
    ) -> Self {
        let pages = Arc::new(PageRegistry::new(Arc::clone(&directory)));
        Self {
            auth,
            catalog,
            directory,
            pages,
        }
    }
}
