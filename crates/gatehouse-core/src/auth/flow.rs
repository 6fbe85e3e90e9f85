//! One submit of the login form, from credentials to a terminal outcome.

use std::sync::Arc;

use tracing::{error, info};

use super::orchestrator::transition;
use super::{Authenticated, Credentials, LoginError, LoginOrchestrator, LoginState, SessionRecord};
use crate::api::{LoginTransport, RouteKind};
use crate::redirect::{OutcomeNotifier, RedirectScheduler};
use crate::storage::SessionStore;

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Succeeded {
        record: SessionRecord,
        provider: RouteKind,
    },
    Failed {
        message: String,
    },
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Succeeded { .. })
    }
}

pub struct LoginFlow<T> {
    orchestrator: LoginOrchestrator<T>,
    store: SessionStore,
    notifier: Arc<dyn OutcomeNotifier>,
    redirect: RedirectScheduler,
}

impl<T: LoginTransport> LoginFlow<T> {
    pub fn new(
        orchestrator: LoginOrchestrator<T>,
        store: SessionStore,
        notifier: Arc<dyn OutcomeNotifier>,
        redirect: RedirectScheduler,
    ) -> Self {
        Self {
            orchestrator,
            store,
            notifier,
            redirect,
        }
    }

    /// Run the whole flow. Every failure is caught here and reported once.
    ///
    /// Re-entrancy is the caller's concern: submit again only after the
    /// previous call has returned.
    pub async fn submit(&self, credentials: Credentials) -> LoginOutcome {
        match self.run(&credentials).await {
            Ok(authenticated) => LoginOutcome::Succeeded {
                record: authenticated.record,
                provider: authenticated.provider,
            },
            Err(e) => {
                error!(error = %e, user = %credentials.identifier, "Login failed");
                let message = e.user_message();
                self.notifier.error(&message);
                LoginOutcome::Failed { message }
            }
        }
    }

    async fn run(&self, credentials: &Credentials) -> Result<Authenticated, LoginError> {
        let authenticated = self.orchestrator.authenticate(credentials).await?;

        let mut state = LoginState::Normalizing;
        transition(&mut state, LoginState::Persisting);
        if let Err(e) = self.store.persist(&authenticated.record).await {
            transition(&mut state, LoginState::Failed);
            return Err(e.into());
        }

        transition(&mut state, LoginState::Succeeded);
        info!(provider = %authenticated.provider, "Login succeeded");
        self.redirect.schedule(self.notifier.as_ref()).await;
        Ok(authenticated)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::api::Endpoints;
    use crate::config::Environment;
    use crate::storage::{MemoryBackend, StorageBackend, StorageTier, DATA_KEY, TOKEN_KEY, USER_KEY};
    use crate::testing::{
        FailingBackend, Notification, RecordingNavigator, RecordingNotifier, ScriptedTransport,
    };
    use serde_json::json;

    const PRIMARY_LOCAL: &str = "https://api.gatehouse.app/api/admin-auth/login";

    struct Harness {
        flow: LoginFlow<ScriptedTransport>,
        durable: MemoryBackend,
        ephemeral: MemoryBackend,
        notifier: Arc<RecordingNotifier>,
        navigator: Arc<RecordingNavigator>,
    }

    fn harness_with(transport: ScriptedTransport, ephemeral_backend: Option<FailingBackend>) -> Harness {
        let endpoints = Endpoints::new(
            Environment::Production,
            "http://localhost:5000/api",
            "https://api.gatehouse.app/api",
            "https://api.gatehouse.app/api",
        );
        let durable = MemoryBackend::new(StorageTier::Durable);
        let ephemeral = MemoryBackend::ephemeral();
        let ephemeral_tier: Arc<dyn StorageBackend> = match ephemeral_backend {
            Some(failing) => Arc::new(failing),
            None => Arc::new(ephemeral.clone()),
        };
        let store = SessionStore::new(Arc::new(durable.clone()), ephemeral_tier);
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let redirect = RedirectScheduler::new(navigator.clone(), "/admin/dashboard", Duration::from_millis(1000));

        Harness {
            flow: LoginFlow::new(
                LoginOrchestrator::new(transport, endpoints, Duration::from_secs(30)),
                store,
                notifier.clone(),
                redirect,
            ),
            durable,
            ephemeral,
            notifier,
            navigator,
        }
    }

    fn harness(transport: ScriptedTransport) -> Harness {
        harness_with(transport, None)
    }

    fn credentials() -> Credentials {
        Credentials::new("admin@example.com", "hunter2")
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_persists_notifies_and_redirects() {
        let h = harness(
            ScriptedTransport::new().respond(PRIMARY_LOCAL, 200, json!({"token": "abc", "admin": {"id": 1}})),
        );

        let outcome = h.flow.submit(credentials()).await;
        assert!(outcome.is_success());

        for backend in [&h.durable, &h.ephemeral] {
            assert_eq!(backend.get(TOKEN_KEY).await.unwrap().as_deref(), Some("abc"));
            assert_eq!(backend.get(USER_KEY).await.unwrap().as_deref(), Some(r#"{"id":1}"#));
            assert_eq!(backend.get(DATA_KEY).await.unwrap().as_deref(), Some(r#"{"id":1}"#));
        }
        assert_eq!(
            h.notifier.notifications(),
            vec![Notification::Success("Login successful".into())]
        );
        assert_eq!(h.navigator.routes(), vec!["/admin/dashboard"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_notifies_without_touching_storage() {
        let h = harness(
            ScriptedTransport::new().respond(PRIMARY_LOCAL, 401, json!({"message": "wrong password"})),
        );
        for backend in [&h.durable, &h.ephemeral] {
            backend.set(TOKEN_KEY, "previous").await.unwrap();
        }

        let outcome = h.flow.submit(credentials()).await;
        assert_eq!(
            outcome,
            LoginOutcome::Failed {
                message: "Incorrect email or password".into()
            }
        );
        for backend in [&h.durable, &h.ephemeral] {
            assert_eq!(backend.get(TOKEN_KEY).await.unwrap().as_deref(), Some("previous"));
            assert_eq!(backend.len().await, 1);
        }
        assert_eq!(
            h.notifier.notifications(),
            vec![Notification::Error("Incorrect email or password".into())]
        );
        assert!(h.navigator.routes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_failure_is_reported_without_redirect() {
        let failing = FailingBackend::new(MemoryBackend::ephemeral());
        failing.fail_on(USER_KEY);
        let h = harness_with(
            ScriptedTransport::new().respond(PRIMARY_LOCAL, 200, json!({"token": "abc"})),
            Some(failing),
        );

        let outcome = h.flow.submit(credentials()).await;
        assert!(!outcome.is_success());
        assert!(h.durable.is_empty().await);
        assert!(h.navigator.routes().is_empty());
        assert!(matches!(
            h.notifier.notifications().as_slice(),
            [Notification::Error(message)] if message.starts_with("Failed to persist session")
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_relogin_overwrites_with_same_record() {
        let h = harness(
            ScriptedTransport::new().respond(PRIMARY_LOCAL, 200, json!({"token": "abc", "admin": {"id": 1}})),
        );

        let first = h.flow.submit(credentials()).await;
        let stored_first = h.durable.get(USER_KEY).await.unwrap();
        let second = h.flow.submit(credentials()).await;

        assert_eq!(first, second);
        assert_eq!(h.durable.get(USER_KEY).await.unwrap(), stored_first);
        assert_eq!(h.durable.len().await, 3);
        assert_eq!(h.navigator.routes().len(), 2);
    }
}
