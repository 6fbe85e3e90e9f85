//! Dual-tier session persistence.
//!
//! This module provides the `StorageBackend` seam, a durable file backend,
//! an ephemeral in-memory backend, and the `SessionStore` that keeps both
//! tiers in step.
//!
//! The durable tier is stored at `~/.local/share/gatehouse/session.json`.

pub mod backend;
pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use backend::{StorageBackend, StorageTier};
pub use error::StorageError;
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use store::{SessionStore, DATA_KEY, TOKEN_KEY, USER_KEY};
