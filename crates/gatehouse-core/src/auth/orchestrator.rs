//! Login orchestration across providers.
//!
//! The orchestrator walks a fixed sequence of stages:
//!
//! 1. privileged route on the environment-selected address
//! 2. privileged route on the production address, only if (1) reported the
//!    route absent
//! 3. standard route, only if (2) reported the route absent
//!
//! The first stage whose route answers decides the flow: a 2xx is normalized
//! into a `SessionRecord`, anything else is a terminal `LoginError`. Only one
//! request is ever in flight.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{normalize, Credentials, LoginError, SessionRecord};
use crate::api::{
    ApiError, AttemptResult, Endpoints, LoginTransport, ProviderTarget, RouteClassifier,
    RouteKind, RouteSignal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    TryingPrimaryLocal,
    TryingPrimaryFallback,
    TryingSecondary,
    Normalizing,
    Persisting,
    Succeeded,
    Failed,
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Record a state change.
pub(crate) fn transition(state: &mut LoginState, next: LoginState) {
    debug!(from = %state, to = %next, "Login state transition");
    *state = next;
}

/// One provider attempt in the fallback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PrimaryLocal,
    PrimaryFallback,
    Secondary,
}

impl Stage {
    pub fn state(self) -> LoginState {
        match self {
            Stage::PrimaryLocal => LoginState::TryingPrimaryLocal,
            Stage::PrimaryFallback => LoginState::TryingPrimaryFallback,
            Stage::Secondary => LoginState::TryingSecondary,
        }
    }

    pub fn target(self, endpoints: &Endpoints) -> &ProviderTarget {
        match self {
            Stage::PrimaryLocal => endpoints.primary(),
            Stage::PrimaryFallback => endpoints.primary_fallback(),
            Stage::Secondary => endpoints.secondary(),
        }
    }

    pub fn classifier(self) -> RouteClassifier {
        match self {
            Stage::PrimaryLocal => RouteClassifier::primary_local(),
            Stage::PrimaryFallback => RouteClassifier::primary_fallback(),
            Stage::Secondary => RouteClassifier::terminal(),
        }
    }

    /// Stage to try when this one reports the route unavailable.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::PrimaryLocal => Some(Stage::PrimaryFallback),
            Stage::PrimaryFallback => Some(Stage::Secondary),
            Stage::Secondary => None,
        }
    }
}

/// Successful result of the provider sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Authenticated {
    pub record: SessionRecord,
    pub provider: RouteKind,
    pub stage: Stage,
}

enum StageOutcome {
    Answered(AttemptResult),
    Advance(Stage),
}

pub struct LoginOrchestrator<T> {
    transport: T,
    endpoints: Endpoints,
    attempt_timeout: Duration,
}

impl<T: LoginTransport> LoginOrchestrator<T> {
    pub fn new(transport: T, endpoints: Endpoints, attempt_timeout: Duration) -> Self {
        Self {
            transport,
            endpoints,
            attempt_timeout,
        }
    }

    /// Run the provider sequence up to and including normalization.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Authenticated, LoginError> {
        let mut state = LoginState::Idle;
        let result = self.run(&mut state, credentials).await;
        if result.is_err() {
            transition(&mut state, LoginState::Failed);
        }
        result
    }

    async fn run(
        &self,
        state: &mut LoginState,
        credentials: &Credentials,
    ) -> Result<Authenticated, LoginError> {
        let mut stage = Stage::PrimaryLocal;
        let answer = loop {
            transition(state, stage.state());
            match self.attempt(stage, credentials).await? {
                StageOutcome::Answered(result) => break result,
                StageOutcome::Advance(next) => stage = next,
            }
        };

        if !answer.succeeded {
            warn!(
                ?stage,
                status = answer.http_status,
                "Login rejected by provider"
            );
            return Err(LoginError::from_rejection(&answer));
        }

        transition(state, LoginState::Normalizing);
        let provider = stage.target(&self.endpoints).route_kind;
        let record = normalize(&answer.body, provider).ok_or_else(|| {
            warn!(?stage, "Successful login response carried no token");
            LoginError::NoSessionExtractable
        })?;

        info!(?stage, %provider, user = %credentials.identifier, "Provider accepted login");
        Ok(Authenticated {
            record,
            provider,
            stage,
        })
    }

    async fn attempt(&self, stage: Stage, credentials: &Credentials) -> Result<StageOutcome, LoginError> {
        let target = stage.target(&self.endpoints);
        debug!(?stage, url = %target.url(), "Attempting login");

        let sent = tokio::time::timeout(
            self.attempt_timeout,
            self.transport.post_login(target, credentials),
        )
        .await
        .unwrap_or(Err(ApiError::Timeout(self.attempt_timeout)));

        let result = match sent {
            Ok(result) => result,
            Err(e) if e.is_timeout() => match stage.next() {
                Some(next) => {
                    warn!(?stage, error = %e, "Login attempt timed out, treating route as unavailable");
                    return Ok(StageOutcome::Advance(next));
                }
                None => return Err(e.into()),
            },
            Err(e) => return Err(e.into()),
        };

        match (stage.classifier().classify(&result), stage.next()) {
            (RouteSignal::RouteUnavailable, Some(next)) => {
                debug!(?stage, status = result.http_status, "Login route unavailable, falling back");
                Ok(StageOutcome::Advance(next))
            }
            _ => Ok(StageOutcome::Answered(result)),
        }
    }
}
