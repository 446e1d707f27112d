//! Document store abstraction
//!
//! The portal treats its document database as an external
//! collaborator: a typed fetch/mutate API keyed by document id.
//! Every write is a compare-and-swap on the document's version tag,
//! so targeted element updates (payments, resubmissions addressed by
//! their `key`) cannot silently lose concurrent edits.

mod memory;

pub use memory::{MemoryCatalogStore, MemoryQuotationStore};

use async_trait::async_trait;
use shared::models::{Quotation, SampleClass, Service, Standard, TestMethod};

/// Store-level failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("duplicate document id: {0}")]
    Duplicate(String),

    #[error("version conflict on {id}: expected {expected}, found {found}")]
    Conflict {
        id: String,
        expected: u64,
        found: u64,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Quotation document store
#[async_trait]
pub trait QuotationStore: Send + Sync {
    async fn get(&self, id: &str) -> StoreResult<Quotation>;

    async fn list(&self) -> StoreResult<Vec<Quotation>>;

    /// Insert a new document; fails on duplicate id
    async fn insert(&self, doc: Quotation) -> StoreResult<Quotation>;

    /// Replace a document if its stored version still matches
    /// `expected_version`; the stored version is bumped on success.
    /// Returns the saved document.
    async fn put(&self, doc: Quotation, expected_version: u64) -> StoreResult<Quotation>;
}

/// Catalog document store
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn standards(&self) -> StoreResult<Vec<Standard>>;
    async fn upsert_standard(&self, doc: Standard) -> StoreResult<()>;
    async fn remove_standard(&self, id: &str) -> StoreResult<()>;

    async fn sample_classes(&self) -> StoreResult<Vec<SampleClass>>;
    async fn upsert_sample_class(&self, doc: SampleClass) -> StoreResult<()>;
    async fn remove_sample_class(&self, id: &str) -> StoreResult<()>;

    async fn test_methods(&self) -> StoreResult<Vec<TestMethod>>;
    async fn upsert_test_method(&self, doc: TestMethod) -> StoreResult<()>;
    async fn remove_test_method(&self, id: &str) -> StoreResult<()>;

    async fn services(&self) -> StoreResult<Vec<Service>>;
    async fn upsert_service(&self, doc: Service) -> StoreResult<()>;
    async fn remove_service(&self, id: &str) -> StoreResult<()>;
}
