//! Terminal implementations of the outcome seams.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use gatehouse_core::redirect::{Navigator, OutcomeNotifier};
use gatehouse_core::storage::{FileBackend, MemoryBackend, SessionStore};

pub struct ConsoleNotifier;

impl OutcomeNotifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("✓ {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }
}

/// Lands on the protected route the way a full page load would: the
/// session is read back from newly opened storage, never from the flow.
pub struct ConsoleNavigator {
    data_dir: PathBuf,
    ephemeral: MemoryBackend,
}

impl ConsoleNavigator {
    pub fn new(data_dir: PathBuf, ephemeral: MemoryBackend) -> Self {
        Self {
            data_dir,
            ephemeral,
        }
    }
}

#[async_trait]
impl Navigator for ConsoleNavigator {
    async fn navigate_full(&self, route: &str) -> Result<()> {
        let store = SessionStore::new(
            Arc::new(FileBackend::in_dir(&self.data_dir)),
            Arc::new(self.ephemeral.clone()),
        );
        let record = store
            .read()
            .await?
            .ok_or_else(|| anyhow::anyhow!("No session found on reload"))?;

        println!("→ {}", route);
        println!("{}", serde_json::to_string_pretty(record.identity())?);
        Ok(())
    }
}
