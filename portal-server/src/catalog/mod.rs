//! Catalog maintenance
//!
//! CRUD over the reference data (standards, sample classes, test
//! methods, services) plus the deletion guard: an entity still
//! referenced by other documents is not deleted, and bulk deletions
//! report `ok | no_deletions | partial` with the blocking references.

use std::sync::Arc;

use shared::models::{
    BlockedRef, DeleteOutcome, SampleClass, Service, Standard, TestMethod,
};
use uuid::Uuid;

use crate::store::{CatalogStore, QuotationStore, StoreError, StoreResult};

/// Catalog service over the document store
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    quotations: Arc<dyn QuotationStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, quotations: Arc<dyn QuotationStore>) -> Self {
        Self { store, quotations }
    }

    // ========== Standards ==========

    pub async fn standards(&self) -> StoreResult<Vec<Standard>> {
        self.store.standards().await
    }

    pub async fn save_standard(&self, mut doc: Standard) -> StoreResult<Standard> {
        if doc.id.is_empty() {
            doc.id = Uuid::new_v4().to_string();
        }
        self.store.upsert_standard(doc.clone()).await?;
        Ok(doc)
    }

    /// Delete standards; a standard referenced by a test method is
    /// blocked
    pub async fn delete_standards(&self, ids: &[String]) -> StoreResult<DeleteOutcome> {
        let methods = self.store.test_methods().await?;
        let mut deleted = Vec::new();
        let mut blocked = Vec::new();

        for id in ids {
            let referenced_by: Vec<String> = methods
                .iter()
                .filter(|m| m.standard_id.as_deref() == Some(id))
                .map(|m| m.id.clone())
                .collect();
            if referenced_by.is_empty() {
                match self.store.remove_standard(id).await {
                    Ok(()) => deleted.push(id.clone()),
                    Err(StoreError::NotFound(_)) => {}
                    Err(err) => return Err(err),
                }
            } else {
                blocked.push(BlockedRef {
                    id: id.clone(),
                    referenced_by,
                });
            }
        }

        Ok(outcome(deleted, blocked))
    }

    // ========== Sample classes ==========

    pub async fn sample_classes(&self) -> StoreResult<Vec<SampleClass>> {
        self.store.sample_classes().await
    }

    pub async fn save_sample_class(&self, mut doc: SampleClass) -> StoreResult<SampleClass> {
        if doc.id.is_empty() {
            doc.id = Uuid::new_v4().to_string();
        }
        for subclass in &mut doc.subclasses {
            if subclass.key.is_empty() {
                subclass.key = Uuid::new_v4().to_string();
            }
        }
        self.store.upsert_sample_class(doc.clone()).await?;
        Ok(doc)
    }

    /// Delete sample classes; blocked when referenced by a test
    /// method or a service
    pub async fn delete_sample_classes(&self, ids: &[String]) -> StoreResult<DeleteOutcome> {
        let methods = self.store.test_methods().await?;
        let services = self.store.services().await?;
        let mut deleted = Vec::new();
        let mut blocked = Vec::new();

        for id in ids {
            let mut referenced_by: Vec<String> = methods
                .iter()
                .filter(|m| m.sample_class_id.as_deref() == Some(id))
                .map(|m| m.id.clone())
                .collect();
            referenced_by.extend(
                services
                    .iter()
                    .filter(|s| s.sample_class_id.as_deref() == Some(id))
                    .map(|s| s.id.clone()),
            );
            if referenced_by.is_empty() {
                match self.store.remove_sample_class(id).await {
                    Ok(()) => deleted.push(id.clone()),
                    Err(StoreError::NotFound(_)) => {}
                    Err(err) => return Err(err),
                }
            } else {
                blocked.push(BlockedRef {
                    id: id.clone(),
                    referenced_by,
                });
            }
        }

        Ok(outcome(deleted, blocked))
    }

    // ========== Test methods ==========

    pub async fn test_methods(&self) -> StoreResult<Vec<TestMethod>> {
        self.store.test_methods().await
    }

    pub async fn save_test_method(&self, mut doc: TestMethod) -> StoreResult<TestMethod> {
        if doc.id.is_empty() {
            doc.id = Uuid::new_v4().to_string();
        }
        self.store.upsert_test_method(doc.clone()).await?;
        Ok(doc)
    }

    /// Delete test methods; blocked when referenced by a service
    pub async fn delete_test_methods(&self, ids: &[String]) -> StoreResult<DeleteOutcome> {
        let services = self.store.services().await?;
        let mut deleted = Vec::new();
        let mut blocked = Vec::new();

        for id in ids {
            let referenced_by: Vec<String> = services
                .iter()
                .filter(|s| s.test_method_ids.iter().any(|m| m == id))
                .map(|s| s.id.clone())
                .collect();
            if referenced_by.is_empty() {
                match self.store.remove_test_method(id).await {
                    Ok(()) => deleted.push(id.clone()),
                    Err(StoreError::NotFound(_)) => {}
                    Err(err) => return Err(err),
                }
            } else {
                blocked.push(BlockedRef {
                    id: id.clone(),
                    referenced_by,
                });
            }
        }

        Ok(outcome(deleted, blocked))
    }

    // ========== Services ==========

    pub async fn services(&self) -> StoreResult<Vec<Service>> {
        self.store.services().await
    }

    pub async fn save_service(&self, mut doc: Service) -> StoreResult<Service> {
        if doc.id.is_empty() {
            doc.id = Uuid::new_v4().to_string();
        }
        self.store.upsert_service(doc.clone()).await?;
        Ok(doc)
    }

    /// Delete services; blocked when any quotation line references
    /// the service
    pub async fn delete_services(&self, ids: &[String]) -> StoreResult<DeleteOutcome> {
        let quotations = self.quotations.list().await?;
        let mut deleted = Vec::new();
        let mut blocked = Vec::new();

        for id in ids {
            let referenced_by: Vec<String> = quotations
                .iter()
                .filter(|q| {
                    q.items.iter().any(|item| &item.service_id == id)
                        || q.revisions
                            .iter()
                            .any(|rev| rev.items.iter().any(|item| &item.service_id == id))
                })
                .map(|q| q.id.clone())
                .collect();
            if referenced_by.is_empty() {
                match self.store.remove_service(id).await {
                    Ok(()) => deleted.push(id.clone()),
                    Err(StoreError::NotFound(_)) => {}
                    Err(err) => return Err(err),
                }
            } else {
                blocked.push(BlockedRef {
                    id: id.clone(),
                    referenced_by,
                });
            }
        }

        Ok(outcome(deleted, blocked))
    }
}

fn outcome(deleted: Vec<String>, blocked: Vec<BlockedRef>) -> DeleteOutcome {
    match (deleted.is_empty(), blocked.is_empty()) {
        (_, true) => DeleteOutcome::Ok { deleted },
        (true, false) => DeleteOutcome::NoDeletions { blocked },
        (false, false) => DeleteOutcome::Partial { deleted, blocked },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotations::test_support::quotation_fixture;
    use crate::store::{MemoryCatalogStore, MemoryQuotationStore};

    fn service(id: &str, method_ids: &[&str]) -> Service {
        Service {
            id: id.to_string(),
            name: format!("Service {}", id),
            code: None,
            test_method_ids: method_ids.iter().map(|s| s.to_string()).collect(),
            sample_class_id: None,
            description: None,
        }
    }

    fn test_method(id: &str, standard_id: Option<&str>) -> TestMethod {
        TestMethod {
            id: id.to_string(),
            name: format!("Method {}", id),
            code: None,
            standard_id: standard_id.map(str::to_string),
            sample_class_id: None,
            attachment: None,
            description: None,
        }
    }

    async fn catalog() -> CatalogService {
        CatalogService::new(
            Arc::new(MemoryCatalogStore::new()),
            Arc::new(MemoryQuotationStore::new()),
        )
    }

    #[tokio::test]
    async fn test_delete_unreferenced_standard_ok() {
        let catalog = catalog().await;
        catalog
            .save_standard(Standard {
                id: "std-1".to_string(),
                name: "ASTM".to_string(),
                code: None,
                description: None,
            })
            .await
            .unwrap();

        let outcome = catalog
            .delete_standards(&["std-1".to_string()])
            .await
            .unwrap();
        assert_eq!(
            outcome,
            DeleteOutcome::Ok {
                deleted: vec!["std-1".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn test_referenced_standard_blocks_deletion() {
        let catalog = catalog().await;
        catalog
            .save_standard(Standard {
                id: "std-1".to_string(),
                name: "ASTM".to_string(),
                code: None,
                description: None,
            })
            .await
            .unwrap();
        catalog
            .save_test_method(test_method("tm-1", Some("std-1")))
            .await
            .unwrap();

        let outcome = catalog
            .delete_standards(&["std-1".to_string()])
            .await
            .unwrap();
        let DeleteOutcome::NoDeletions { blocked } = outcome else {
            panic!("expected no_deletions, got {:?}", outcome);
        };
        assert_eq!(blocked[0].id, "std-1");
        assert_eq!(blocked[0].referenced_by, vec!["tm-1".to_string()]);
    }

    #[tokio::test]
    async fn test_partial_deletion_reports_both_sides() {
        let catalog = catalog().await;
        catalog
            .save_test_method(test_method("tm-1", None))
            .await
            .unwrap();
        catalog
            .save_test_method(test_method("tm-2", None))
            .await
            .unwrap();
        catalog
            .save_service(service("svc-1", &["tm-2"]))
            .await
            .unwrap();

        let outcome = catalog
            .delete_test_methods(&["tm-1".to_string(), "tm-2".to_string()])
            .await
            .unwrap();
        let DeleteOutcome::Partial { deleted, blocked } = outcome else {
            panic!("expected partial, got {:?}", outcome);
        };
        assert_eq!(deleted, vec!["tm-1".to_string()]);
        assert_eq!(blocked[0].id, "tm-2");
        assert_eq!(blocked[0].referenced_by, vec!["svc-1".to_string()]);
    }

    #[tokio::test]
    async fn test_service_referenced_by_quotation_is_blocked() {
        let quotations = Arc::new(MemoryQuotationStore::new());
        quotations.insert(quotation_fixture()).await.unwrap();
        let catalog = CatalogService::new(Arc::new(MemoryCatalogStore::new()), quotations);

        catalog
            .save_service(service("svc-cbr", &[]))
            .await
            .unwrap();

        let outcome = catalog
            .delete_services(&["svc-cbr".to_string()])
            .await
            .unwrap();
        let DeleteOutcome::NoDeletions { blocked } = outcome else {
            panic!("expected no_deletions, got {:?}", outcome);
        };
        assert_eq!(blocked[0].referenced_by, vec!["q-1".to_string()]);
    }
}
