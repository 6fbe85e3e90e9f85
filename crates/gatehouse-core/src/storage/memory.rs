use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{StorageBackend, StorageError, StorageTier};

/// In-process backend. Clones share the same map, so one handle can be
/// passed to every component of the process that needs the tier.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    tier: StorageTier,
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new(tier: StorageTier) -> Self {
        Self {
            tier,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn ephemeral() -> Self {
        Self::new(StorageTier::Ephemeral)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn tier(&self) -> StorageTier {
        self.tier
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
