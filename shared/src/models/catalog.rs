//! Catalog models
//!
//! Reference data maintained by internal staff: standards, sample
//! classes, test methods and services. Deletion outcomes carry the
//! `ok | no_deletions | partial` tags rendered by the UI.

use serde::{Deserialize, Serialize};

use super::FileRef;

/// Testing standard (e.g. ASTM, ISO)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Standard {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Subclass entry within a sample class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleSubclass {
    pub key: String,
    pub name: String,
}

/// Sample class with its hierarchical subclass list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleClass {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub subclasses: Vec<SampleSubclass>,
}

/// Test method associated with a standard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestMethod {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<FileRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A service offered in quotations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub test_method_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An entity that could not be deleted and the documents holding
/// references to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockedRef {
    pub id: String,
    pub referenced_by: Vec<String>,
}

/// Result of a bulk catalog deletion
///
/// Referential-integrity blocks are not hard errors; the UI renders
/// them as a warning listing the blocking references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// Everything requested was deleted
    Ok { deleted: Vec<String> },
    /// Nothing could be deleted
    NoDeletions { blocked: Vec<BlockedRef> },
    /// Some entities were deleted, the rest are still referenced
    Partial {
        deleted: Vec<String>,
        blocked: Vec<BlockedRef>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_outcome_tags() {
        let ok = DeleteOutcome::Ok { deleted: vec!["a".into()] };
        assert!(serde_json::to_string(&ok).unwrap().contains("\"outcome\":\"ok\""));

        let none = DeleteOutcome::NoDeletions { blocked: vec![] };
        assert!(serde_json::to_string(&none)
            .unwrap()
            .contains("\"outcome\":\"no_deletions\""));

        let partial = DeleteOutcome::Partial {
            deleted: vec!["a".into()],
            blocked: vec![BlockedRef {
                id: "b".into(),
                referenced_by: vec!["svc-1".into()],
            }],
        };
        assert!(serde_json::to_string(&partial)
            .unwrap()
            .contains("\"outcome\":\"partial\""));
    }
}
