//! Uploaded file reference

use serde::{Deserialize, Serialize};

/// Reference to a stored file, as returned by the upload endpoint
///
/// Wire format (camelCase) matches the upload response:
/// `{ "fileId": "...", "url": "...", "fileName": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub file_id: String,
    pub url: String,
    pub file_name: String,
}
