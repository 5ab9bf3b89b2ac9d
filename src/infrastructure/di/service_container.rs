//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ImportService, TemplateService};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::store::JsonStore;
use crate::infrastructure::traits::{CsvRowSource, LedgerStore, NodeStore, RowSource};
use crate::application::error_ext::IoResultExt;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Artifact decoding seam
    pub source: Arc<dyn RowSource>,

    /// Persistent node store seam
    pub nodes: Arc<dyn NodeStore>,

    /// Financial ledger seam
    pub ledger: Arc<dyn LedgerStore>,

    /// Import orchestration
    pub importer: ImportService,

    /// Template export
    pub template: TemplateService,
}

impl ServiceContainer {
    /// Create a container backed by the JSON store from settings.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        let store = Arc::new(
            JsonStore::open(&settings.store_path)
                .with_path_context("open store", &settings.store_path)?,
        );
        Ok(Self::with_deps(
            settings,
            Arc::new(CsvRowSource),
            store.clone(),
            store,
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        source: Arc<dyn RowSource>,
        nodes: Arc<dyn NodeStore>,
        ledger: Arc<dyn LedgerStore>,
    ) -> Self {
        let settings = Arc::new(settings);
        let importer = ImportService::new(
            source.clone(),
            nodes.clone(),
            ledger.clone(),
            settings.duplicate_policy,
        );

        Self {
            settings,
            source,
            nodes,
            ledger,
            importer,
            template: TemplateService::new(),
        }
    }
}
