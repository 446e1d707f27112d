//! In-memory document store
//!
//! DashMap-backed implementation used at runtime and in tests. The
//! compare-and-swap in `put` runs under the map's per-entry lock, so
//! concurrent writers observe a consistent version check.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::{Quotation, SampleClass, Service, Standard, TestMethod};

use super::{CatalogStore, QuotationStore, StoreError, StoreResult};

/// In-memory quotation store
#[derive(Debug, Default)]
pub struct MemoryQuotationStore {
    docs: DashMap<String, Quotation>,
}

impl MemoryQuotationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuotationStore for MemoryQuotationStore {
    async fn get(&self, id: &str) -> StoreResult<Quotation> {
        self.docs
            .get(id)
            .map(|doc| doc.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list(&self) -> StoreResult<Vec<Quotation>> {
        Ok(self.docs.iter().map(|entry| entry.clone()).collect())
    }

    async fn insert(&self, doc: Quotation) -> StoreResult<Quotation> {
        match self.docs.entry(doc.id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StoreError::Duplicate(doc.id)),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(doc.clone());
                Ok(doc)
            }
        }
    }

    async fn put(&self, mut doc: Quotation, expected_version: u64) -> StoreResult<Quotation> {
        let mut entry = self
            .docs
            .get_mut(&doc.id)
            .ok_or_else(|| StoreError::NotFound(doc.id.clone()))?;

        if entry.version != expected_version {
            return Err(StoreError::Conflict {
                id: doc.id.clone(),
                expected: expected_version,
                found: entry.version,
            });
        }

        doc.version = expected_version + 1;
        *entry = doc.clone();
        Ok(doc)
    }
}

/// In-memory catalog store
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    standards: DashMap<String, Standard>,
    sample_classes: DashMap<String, SampleClass>,
    test_methods: DashMap<String, TestMethod>,
    services: DashMap<String, Service>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn standards(&self) -> StoreResult<Vec<Standard>> {
        Ok(self.standards.iter().map(|e| e.clone()).collect())
    }

    async fn upsert_standard(&self, doc: Standard) -> StoreResult<()> {
        self.standards.insert(doc.id.clone(), doc);
        Ok(())
    }

    async fn remove_standard(&self, id: &str) -> StoreResult<()> {
        self.standards
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn sample_classes(&self) -> StoreResult<Vec<SampleClass>> {
        Ok(self.sample_classes.iter().map(|e| e.clone()).collect())
    }

    async fn upsert_sample_class(&self, doc: SampleClass) -> StoreResult<()> {
        self.sample_classes.insert(doc.id.clone(), doc);
        Ok(())
    }

    async fn remove_sample_class(&self, id: &str) -> StoreResult<()> {
        self.sample_classes
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn test_methods(&self) -> StoreResult<Vec<TestMethod>> {
        Ok(self.test_methods.iter().map(|e| e.clone()).collect())
    }

    async fn upsert_test_method(&self, doc: TestMethod) -> StoreResult<()> {
        self.test_methods.insert(doc.id.clone(), doc);
        Ok(())
    }

    async fn remove_test_method(&self, id: &str) -> StoreResult<()> {
        self.test_methods
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn services(&self) -> StoreResult<Vec<Service>> {
        Ok(self.services.iter().map(|e| e.clone()).collect())
    }

    async fn upsert_service(&self, doc: Service) -> StoreResult<()> {
        self.services.insert(doc.id.clone(), doc);
        Ok(())
    }

    async fn remove_service(&self, id: &str) -> StoreResult<()> {
        self.services
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
