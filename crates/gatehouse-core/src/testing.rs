//! Test doubles shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ApiError, AttemptResult, Body, LoginTransport, ProviderTarget};
use crate::auth::Credentials;
use crate::redirect::{Navigator, OutcomeNotifier};
use crate::storage::{MemoryBackend, StorageBackend, StorageError, StorageTier};

/// Memory backend that can be told to fail specific writes.
#[derive(Clone)]
pub struct FailingBackend {
    inner: MemoryBackend,
    fail_once: Arc<Mutex<HashSet<String>>>,
    fail_removals: Arc<Mutex<bool>>,
}

impl FailingBackend {
    pub fn new(inner: MemoryBackend) -> Self {
        Self {
            inner,
            fail_once: Arc::default(),
            fail_removals: Arc::default(),
        }
    }

    /// Fail the next `set` of `key`.
    pub fn fail_on(&self, key: &str) {
        self.fail_once.lock().unwrap().insert(key.to_string());
    }

    /// Fail every `remove`.
    pub fn fail_removals(&self) {
        *self.fail_removals.lock().unwrap() = true;
    }

    fn unavailable(&self, reason: String) -> StorageError {
        StorageError::Unavailable {
            tier: self.inner.tier(),
            reason,
        }
    }
}

#[async_trait]
impl StorageBackend for FailingBackend {
    fn tier(&self) -> StorageTier {
        self.inner.tier()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_once.lock().unwrap().remove(key) {
            return Err(self.unavailable(format!("write of {} refused", key)));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        if *self.fail_removals.lock().unwrap() {
            return Err(self.unavailable(format!("removal of {} refused", key)));
        }
        self.inner.remove(key).await
    }
}

#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(u16, Value),
    TransportError(String),
    Hang,
}

/// Transport answering from a per-URL script and recording every call.
#[derive(Default)]
pub struct ScriptedTransport {
    script: HashMap<String, Scripted>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: Value) -> Self {
        self.script
            .insert(url.to_string(), Scripted::Respond(status, body));
        self
    }

    pub fn fail(mut self, url: &str, message: &str) -> Self {
        self.script
            .insert(url.to_string(), Scripted::TransportError(message.to_string()));
        self
    }

    pub fn hang(mut self, url: &str) -> Self {
        self.script.insert(url.to_string(), Scripted::Hang);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LoginTransport for ScriptedTransport {
    async fn post_login(
        &self,
        target: &ProviderTarget,
        _credentials: &Credentials,
    ) -> Result<AttemptResult, ApiError> {
        let url = target.url();
        self.calls.lock().unwrap().push(url.clone());
        match self.script.get(&url).cloned() {
            Some(Scripted::Respond(status, body)) => Ok(AttemptResult::new(
                status,
                body.as_object().cloned().unwrap_or_else(Body::new),
            )),
            Some(Scripted::TransportError(message)) => Err(ApiError::InvalidRequest(message)),
            Some(Scripted::Hang) => futures::future::pending().await,
            None => panic!("unscripted request to {}", url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl OutcomeNotifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push(Notification::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push(Notification::Error(message.to_string()));
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate_full(&self, route: &str) -> anyhow::Result<()> {
        self.routes.lock().unwrap().push(route.to_string());
        Ok(())
    }
}
