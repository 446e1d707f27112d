//! File storage and the upload-then-reference saga
//!
//! Every attached document (payment proofs, receipts, invoices,
//! test-method files) is stored first and referenced in a follow-up
//! mutation. When the reference step fails after the upload
//! succeeded, the file id is recorded in the [`OrphanLedger`] and a
//! background sweep deletes it.

mod local;

pub use local::LocalFileStorage;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashSet;
use shared::models::FileRef;
use tokio::task::JoinHandle;

/// File storage failure
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// External file storage service
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store a file and return its reference
    async fn store(&self, file_name: &str, bytes: Vec<u8>) -> Result<FileRef, FileError>;

    /// Delete a stored file by id
    async fn delete(&self, file_id: &str) -> Result<(), FileError>;
}

/// Uploaded file ids whose reference step failed
#[derive(Debug, Default)]
pub struct OrphanLedger {
    ids: DashSet<String>,
}

impl OrphanLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file id that was uploaded but never referenced
    pub fn record(&self, file_id: impl Into<String>) {
        let file_id = file_id.into();
        tracing::warn!(file_id = %file_id, "Recording orphaned upload for cleanup");
        self.ids.insert(file_id);
    }

    /// Drain all recorded orphans
    pub fn drain(&self) -> Vec<String> {
        let ids: Vec<String> = self.ids.iter().map(|id| id.clone()).collect();
        for id in &ids {
            self.ids.remove(id);
        }
        ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Spawn the periodic orphan sweep task
pub fn spawn_orphan_sweeper(
    storage: Arc<dyn FileStorage>,
    ledger: Arc<OrphanLedger>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            sweep_orphans(storage.as_ref(), &ledger).await;
        }
    })
}

/// Delete all recorded orphans; ids that fail to delete are re-recorded
pub async fn sweep_orphans(storage: &dyn FileStorage, ledger: &OrphanLedger) {
    for file_id in ledger.drain() {
        match storage.delete(&file_id).await {
            Ok(()) => tracing::info!(file_id = %file_id, "Deleted orphaned upload"),
            Err(FileError::NotFound(_)) => {}
            Err(err) => {
                tracing::warn!(file_id = %file_id, error = %err, "Orphan sweep failed, will retry");
                ledger.record(file_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_orphan_ledger_drain() {
        let ledger = OrphanLedger::new();
        ledger.record("f-1");
        ledger.record("f-2");
        assert_eq!(ledger.len(), 2);

        let mut drained = ledger.drain();
        drained.sort();
        assert_eq!(drained, vec!["f-1".to_string(), "f-2".to_string()]);
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_deletes_orphans() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());
        let ledger = OrphanLedger::new();

        let file = storage.store("proof.png", vec![1, 2, 3]).await.unwrap();
        ledger.record(file.file_id.clone());

        sweep_orphans(&storage, &ledger).await;
        assert!(ledger.is_empty());
        assert!(matches!(
            storage.delete(&file.file_id).await,
            Err(FileError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_sweep_ignores_already_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());
        let ledger = OrphanLedger::new();
        ledger.record("never-existed");

        sweep_orphans(&storage, &ledger).await;
        assert!(ledger.is_empty());
    }
}
