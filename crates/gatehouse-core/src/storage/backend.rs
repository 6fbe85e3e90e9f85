use std::fmt;

use async_trait::async_trait;

use super::StorageError;

/// One of the two independent persistence scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageTier {
    /// Survives process restarts.
    Durable,
    /// Lives as long as the process.
    Ephemeral,
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageTier::Durable => write!(f, "durable"),
            StorageTier::Ephemeral => write!(f, "ephemeral"),
        }
    }
}

/// String key-value store backing one tier.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn tier(&self) -> StorageTier;

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
