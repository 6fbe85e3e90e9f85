use std::fmt;

use serde_json::{Map, Value};

/// Identity payload returned by a provider, stored as-is.
pub type Identity = Map<String, Value>;

/// Canonical session produced by a successful login.
#[derive(Clone, PartialEq)]
pub struct SessionRecord {
    token: String,
    identity: Identity,
}

impl SessionRecord {
    /// Returns `None` for an empty token; a record always carries a usable token.
    pub fn new(token: impl Into<String>, identity: Identity) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            return None;
        }
        Some(Self { token, identity })
    }

    /// Get the bearer token
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

impl fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRecord")
            .field("token", &"[REDACTED]")
            .field("identity", &self.identity)
            .finish()
    }
}
