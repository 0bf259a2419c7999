//! Shared application state

use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::store::ReadingStore;

/// State handed to every request handler.
///
/// Both fields are trait objects so the backend (SQLite vs Postgres) and the
/// analyzer (real API vs test stub) are wired once at startup.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ReadingStore>,
    analyzer: Arc<dyn Analyzer>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReadingStore>, analyzer: Arc<dyn Analyzer>) -> Self {
        AppState { store, analyzer }
    }

    pub fn store(&self) -> &dyn ReadingStore {
        self.store.as_ref()
    }

    pub fn analyzer(&self) -> &dyn Analyzer {
        self.analyzer.as_ref()
    }
}
