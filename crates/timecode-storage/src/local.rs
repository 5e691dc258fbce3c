//! Local directory store for development runs.
//!
//! Objects are written as plain files under a root directory, one file per
//! key. Content type is not persisted.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{validate_key, StorageError, StorageResult};
use crate::store::ObjectStore;

/// Object store backed by a local directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem path an object key maps to.
    pub fn object_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn location(&self) -> String {
        format!("file://{}", self.root.display())
    }

    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()> {
        let path = self.object_path(key)?;
        debug!("Writing {} bytes ({}) to {}", data.len(), content_type, path.display());

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Each write gets its own sibling temp file; overlapping runs may
        // target the same key.
        let tmp = temp_path(&path);
        if let Err(e) = write_then_rename(&tmp, &path, data).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        info!("Wrote {}", path.display());
        Ok(())
    }

    async fn check_connectivity(&self) -> StorageResult<()> {
        let metadata = tokio::fs::metadata(&self.root).await?;
        if !metadata.is_dir() {
            return Err(StorageError::config_error(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
}

async fn write_then_rename(tmp: &Path, path: &Path, data: Vec<u8>) -> std::io::Result<()> {
    tokio::fs::write(tmp, data).await?;
    tokio::fs::rename(tmp, path).await
}
