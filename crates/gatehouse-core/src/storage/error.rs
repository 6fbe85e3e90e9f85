use std::path::PathBuf;

use thiserror::Error;

use super::StorageTier;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt session file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{tier} storage unavailable: {reason}")]
    Unavailable { tier: StorageTier, reason: String },

    #[error("Session write failed ({write}) and rollback failed ({rollback})")]
    PartialWrite {
        write: Box<StorageError>,
        rollback: Box<StorageError>,
    },
}
