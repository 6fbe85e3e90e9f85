use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{StorageBackend, StorageError, StorageTier};

/// Session file name in the data directory
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct TierDocument {
    entries: BTreeMap<String, String>,
    updated_at: Option<DateTime<Utc>>,
}

/// Durable backend: one JSON document on disk, rewritten on every change.
pub struct FileBackend {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process.
    lock: Mutex<()>,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Backend for `session.json` inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time of the last write, if the file exists.
    pub async fn updated_at(&self) -> Result<Option<DateTime<Utc>>, StorageError> {
        Ok(self.load().await?.updated_at)
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn load(&self) -> Result<TierDocument, StorageError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TierDocument::default()),
            Err(e) => return Err(self.io_error(e)),
        };
        serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Load the document, replacing a corrupt one with an empty document.
    /// The flag reports whether the on-disk file needs rewriting.
    async fn load_or_reset(&self) -> Result<(TierDocument, bool), StorageError> {
        match self.load().await {
            Ok(document) => Ok((document, false)),
            Err(e @ StorageError::Corrupt { .. }) => {
                warn!(error = %e, "Discarding corrupt session file");
                Ok((TierDocument::default(), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn store(&self, mut document: TierDocument) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        document.updated_at = Some(Utc::now());
        let contents = serde_json::to_string_pretty(&document)?;

        // Readers never observe a partially written document.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), "Session file written");
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    fn tier(&self) -> StorageTier {
        StorageTier::Durable
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.load_or_reset().await?.0.entries.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let (mut document, _) = self.load_or_reset().await?;
        document.entries.insert(key.to_string(), value.to_string());
        self.store(document).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let (mut document, reset) = self.load_or_reset().await?;
        if document.entries.remove(key).is_none() && !reset {
            return Ok(());
        }
        self.store(document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::in_dir(dir.path());

        assert_eq!(backend.get("token").await.unwrap(), None);
        assert_eq!(backend.updated_at().await.unwrap(), None);
        backend.remove("token").await.unwrap();
        assert!(!backend.path().exists());
    }

    #[tokio::test]
    async fn test_set_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("gatehouse");

        let backend = FileBackend::in_dir(&nested);
        backend.set("token", "abc").await.unwrap();
        backend.set("user", r#"{"id":1}"#).await.unwrap();
        assert!(backend.updated_at().await.unwrap().is_some());

        let reopened = FileBackend::in_dir(&nested);
        assert_eq!(reopened.get("token").await.unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get("user").await.unwrap().as_deref(), Some(r#"{"id":1}"#));

        reopened.remove("token").await.unwrap();
        assert_eq!(backend.get("token").await.unwrap(), None);
        assert!(!nested.join("session.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_empty_and_is_replaced() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::in_dir(dir.path());
        std::fs::write(backend.path(), "{truncated").unwrap();

        assert!(matches!(backend.load().await, Err(StorageError::Corrupt { .. })));
        assert_eq!(backend.get("token").await.unwrap(), None);

        backend.set("token", "abc").await.unwrap();
        assert_eq!(backend.get("token").await.unwrap().as_deref(), Some("abc"));
        assert!(backend.load().await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_rewrites_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::in_dir(dir.path());
        std::fs::write(backend.path(), "{truncated").unwrap();

        backend.remove("token").await.unwrap();
        let document = backend.load().await.unwrap();
        assert!(document.entries.is_empty());
    }
}
