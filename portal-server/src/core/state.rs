use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use shared::types::Principal;

use crate::catalog::CatalogService;
use crate::core::Config;
use crate::files::{self, FileStorage, LocalFileStorage, OrphanLedger};
use crate::pdf::{PdfRenderer, PlainTextRenderer};
use crate::quotations::actions::ActionContext;
use crate::store::{CatalogStore, MemoryCatalogStore, MemoryQuotationStore, QuotationStore};

/// Shared handles for everything the HTTP handlers need
///
/// Cloning is cheap; all services sit behind an Arc.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub quotations: Arc<dyn QuotationStore>,
    pub catalog: CatalogService,
    pub files: Arc<dyn FileStorage>,
    pub renderer: Arc<dyn PdfRenderer>,
    pub orphans: Arc<OrphanLedger>,
}

impl ServerState {
    /// Initialize state: upload directory, stores, renderer
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let upload_dir = config.upload_dir();
        tokio::fs::create_dir_all(&upload_dir).await?;

        let quotations: Arc<dyn QuotationStore> = Arc::new(MemoryQuotationStore::new());
        let catalog_store: Arc<dyn CatalogStore> = Arc::new(MemoryCatalogStore::new());
        let catalog = CatalogService::new(catalog_store, quotations.clone());

        Ok(Self {
            config: config.clone(),
            quotations,
            catalog,
            files: Arc::new(LocalFileStorage::new(upload_dir)),
            renderer: Arc::new(PlainTextRenderer),
            orphans: Arc::new(OrphanLedger::new()),
        })
    }

    /// Start background tasks. Must be called before serving traffic.
    pub fn start_background_tasks(&self) {
        let _ = files::spawn_orphan_sweeper(
            self.files.clone(),
            self.orphans.clone(),
            Duration::from_millis(self.config.orphan_sweep_interval_ms),
        );
    }

    /// Build an action context for the given principal, stamped with
    /// the current time
    pub fn action_ctx<'a>(&'a self, principal: &'a Principal) -> ActionContext<'a> {
        ActionContext {
            store: self.quotations.as_ref(),
            files: self.files.as_ref(),
            renderer: self.renderer.as_ref(),
            orphans: &self.orphans,
            principal,
            now: Utc::now().timestamp_millis(),
        }
    }
}
