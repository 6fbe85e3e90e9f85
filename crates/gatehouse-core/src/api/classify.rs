//! Route availability classification.
//!
//! A failed privileged attempt is only worth retrying elsewhere when the
//! address does not expose the login route at all. Which responses count as
//! "route absent" is decided here, by an ordered list of rules per stage, so
//! the orchestrator only ever sees a `RouteSignal`.

use super::AttemptResult;

/// Message some deployments return instead of a 404 for an unknown route.
pub const INVALID_ROUTE_SENTINEL: &str = "Invalid route";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRule {
    /// HTTP 404.
    StatusNotFound,
    /// Body `message` equals the given text exactly.
    SentinelMessage(&'static str),
}

impl RouteRule {
    fn matches(&self, result: &AttemptResult) -> bool {
        match self {
            RouteRule::StatusNotFound => result.http_status == 404,
            RouteRule::SentinelMessage(sentinel) => result.message() == Some(*sentinel),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSignal {
    /// The route answered; the result is final for this stage.
    Answered,
    /// The address does not expose the route; try the next stage.
    RouteUnavailable,
}

#[derive(Debug, Clone, Default)]
pub struct RouteClassifier {
    rules: Vec<RouteRule>,
}

impl RouteClassifier {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// Rules for the environment-selected privileged attempt.
    pub fn primary_local() -> Self {
        Self::new(vec![RouteRule::StatusNotFound])
    }

    /// Rules for the production privileged retry.
    pub fn primary_fallback() -> Self {
        Self::new(vec![
            RouteRule::StatusNotFound,
            RouteRule::SentinelMessage(INVALID_ROUTE_SENTINEL),
        ])
    }

    /// The last stage never falls through.
    pub fn terminal() -> Self {
        Self::default()
    }

    pub fn classify(&self, result: &AttemptResult) -> RouteSignal {
        if result.succeeded {
            return RouteSignal::Answered;
        }
        if self.rules.iter().any(|rule| rule.matches(result)) {
            RouteSignal::RouteUnavailable
        } else {
            RouteSignal::Answered
        }
    }
}
