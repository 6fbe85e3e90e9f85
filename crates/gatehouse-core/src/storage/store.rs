use std::sync::Arc;

use futures::future;
use tracing::{debug, info, warn};

use super::{StorageBackend, StorageError, StorageTier};
use crate::auth::{Identity, SessionRecord};

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the serialized identity, for readers that expect a user object.
pub const USER_KEY: &str = "user";

/// Key holding the same serialized identity, for readers that expect a data object.
pub const DATA_KEY: &str = "data";

/// Write order inside one tier.
const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, USER_KEY, DATA_KEY];

type Snapshot = Vec<(&'static str, Option<String>)>;

/// Session persistence over a durable and an ephemeral tier.
///
/// Both tiers always hold the same record: `persist` writes both or, when
/// either write fails, restores both to what they held before the call.
#[derive(Clone)]
pub struct SessionStore {
    durable: Arc<dyn StorageBackend>,
    ephemeral: Arc<dyn StorageBackend>,
}

impl SessionStore {
    pub fn new(durable: Arc<dyn StorageBackend>, ephemeral: Arc<dyn StorageBackend>) -> Self {
        Self { durable, ephemeral }
    }

    fn backend(&self, tier: StorageTier) -> &dyn StorageBackend {
        match tier {
            StorageTier::Durable => self.durable.as_ref(),
            StorageTier::Ephemeral => self.ephemeral.as_ref(),
        }
    }

    /// Overwrite the full record in both tiers.
    pub async fn persist(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let identity = serde_json::to_string(record.identity())?;

        let (durable_before, ephemeral_before) =
            future::try_join(snapshot(self.durable.as_ref()), snapshot(self.ephemeral.as_ref()))
                .await?;

        let (durable, ephemeral) = future::join(
            write_record(self.durable.as_ref(), record.token(), &identity),
            write_record(self.ephemeral.as_ref(), record.token(), &identity),
        )
        .await;

        let write_error = match (durable, ephemeral) {
            (Ok(()), Ok(())) => {
                info!(identity_fields = record.identity().len(), "Session persisted to both tiers");
                return Ok(());
            }
            (Err(e), _) | (Ok(()), Err(e)) => e,
        };

        warn!(error = %write_error, "Session write failed, restoring both tiers");
        let rollback = future::try_join(
            restore(self.durable.as_ref(), &durable_before),
            restore(self.ephemeral.as_ref(), &ephemeral_before),
        )
        .await;

        match rollback {
            Ok(_) => Err(write_error),
            Err(rollback_error) => Err(StorageError::PartialWrite {
                write: Box::new(write_error),
                rollback: Box::new(rollback_error),
            }),
        }
    }

    /// Read the record both tiers agree on; disagreement reads as no session.
    pub async fn read(&self) -> Result<Option<SessionRecord>, StorageError> {
        let (durable, ephemeral) = future::try_join(
            self.read_tier(StorageTier::Durable),
            self.read_tier(StorageTier::Ephemeral),
        )
        .await?;

        match (durable, ephemeral) {
            (Some(durable), Some(ephemeral)) if durable == ephemeral => Ok(Some(durable)),
            (None, None) => Ok(None),
            _ => {
                warn!("Storage tiers disagree, treating as signed out");
                Ok(None)
            }
        }
    }

    /// Read the record held by a single tier.
    pub async fn read_tier(&self, tier: StorageTier) -> Result<Option<SessionRecord>, StorageError> {
        let backend = self.backend(tier);
        let Some(token) = backend.get(TOKEN_KEY).await? else {
            return Ok(None);
        };

        let mut identity = None;
        for key in [USER_KEY, DATA_KEY] {
            if let Some(raw) = backend.get(key).await? {
                identity = Some(parse_identity(tier, key, &raw));
                break;
            }
        }
        Ok(SessionRecord::new(token, identity.unwrap_or_default()))
    }

    /// Remove the record from both tiers.
    pub async fn clear(&self) -> Result<(), StorageError> {
        future::try_join(
            clear_tier(self.durable.as_ref()),
            clear_tier(self.ephemeral.as_ref()),
        )
        .await?;
        info!("Session cleared from both tiers");
        Ok(())
    }
}

fn parse_identity(tier: StorageTier, key: &str, raw: &str) -> Identity {
    if raw.trim().is_empty() {
        return Identity::new();
    }
    match serde_json::from_str::<Identity>(raw) {
        Ok(identity) => identity,
        Err(e) => {
            warn!(%tier, key, error = %e, "Stored identity is not a JSON object, using empty identity");
            Identity::new()
        }
    }
}

async fn write_record(
    backend: &dyn StorageBackend,
    token: &str,
    identity: &str,
) -> Result<(), StorageError> {
    backend.set(TOKEN_KEY, token).await?;
    backend.set(USER_KEY, identity).await?;
    backend.set(DATA_KEY, identity).await?;
    debug!(tier = %backend.tier(), "Session written");
    Ok(())
}

async fn snapshot(backend: &dyn StorageBackend) -> Result<Snapshot, StorageError> {
    let mut entries = Vec::with_capacity(SESSION_KEYS.len());
    for key in SESSION_KEYS {
        entries.push((key, backend.get(key).await?));
    }
    Ok(entries)
}

async fn restore(backend: &dyn StorageBackend, snapshot: &Snapshot) -> Result<(), StorageError> {
    for (key, value) in snapshot {
        match value {
            Some(value) => backend.set(key, value).await?,
            None => backend.remove(key).await?,
        }
    }
    Ok(())
}

async fn clear_tier(backend: &dyn StorageBackend) -> Result<(), StorageError> {
    for key in SESSION_KEYS {
        backend.remove(key).await?;
    }
    Ok(())
}
