//! Post-login hand-off.
//!
//! After a session is persisted the user is told, and after a short delay
//! the protected area is loaded with a full navigation. A full navigation
//! starts from storage rather than from any in-memory state, so the guard
//! on the protected route sees the record that was just written.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

/// Text of the success notification.
pub const SUCCESS_MESSAGE: &str = "Login successful";

/// Surfaces the outcome of a login to the user.
pub trait OutcomeNotifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Performs a full, non-incremental navigation.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate_full(&self, route: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct RedirectScheduler {
    navigator: Arc<dyn Navigator>,
    route: String,
    delay: Duration,
}

impl RedirectScheduler {
    pub fn new(navigator: Arc<dyn Navigator>, route: impl Into<String>, delay: Duration) -> Self {
        Self {
            navigator,
            route: route.into(),
            delay,
        }
    }

    /// Notify success, wait, then navigate. Call only once the session is persisted.
    pub async fn schedule(&self, notifier: &dyn OutcomeNotifier) {
        notifier.success(SUCCESS_MESSAGE);
        tokio::time::sleep(self.delay).await;

        match self.navigator.navigate_full(&self.route).await {
            Ok(()) => info!(route = %self.route, "Redirected to protected area"),
            Err(e) => warn!(route = %self.route, error = %e, "Navigation after login failed"),
        }
    }
}
