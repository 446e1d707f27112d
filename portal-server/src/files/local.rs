//! Local-disk file storage
//!
//! Files are stored under the work directory as `<file_id>_<name>`;
//! the id doubles as the deletion handle. Stands in for the external
//! upload/storage service.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use shared::models::FileRef;
use uuid::Uuid;

use super::{FileError, FileStorage};

#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, file_id: &str, file_name: &str) -> PathBuf {
        self.root.join(format!("{}_{}", file_id, sanitize(file_name)))
    }

    async fn find_by_id(&self, file_id: &str) -> Result<Option<PathBuf>, FileError> {
        let prefix = format!("{}_", file_id);
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry
                .file_name()
                .to_string_lossy()
                .starts_with(&prefix)
            {
                return Ok(Some(entry.path()));
            }
        }
        Ok(None)
    }
}

/// Keep file names path-safe
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, file_name: &str, bytes: Vec<u8>) -> Result<FileRef, FileError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let file_id = Uuid::new_v4().to_string();
        let path = self.path_for(&file_id, file_name);
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(file_id = %file_id, file_name = %file_name, "Stored file");
        Ok(FileRef {
            file_id: file_id.clone(),
            url: format!("/files/{}", file_id),
            file_name: file_name.to_string(),
        })
    }

    async fn delete(&self, file_id: &str) -> Result<(), FileError> {
        match self.find_by_id(file_id).await? {
            Some(path) => {
                tokio::fs::remove_file(path).await?;
                Ok(())
            }
            None => Err(FileError::NotFound(file_id.to_string())),
        }
    }
}
