//! HTTP transport for the login providers.
//!
//! This module provides the `LoginTransport` seam the orchestrator drives and
//! `HttpTransport`, its reqwest implementation. A transport never judges a
//! response: it reports status and body, and leaves classification to the
//! caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{ApiError, ProviderTarget};
use crate::auth::Credentials;

/// Maximum length for response bodies echoed into logs
const MAX_LOGGED_BODY_LENGTH: usize = 200;

/// JSON object returned by a provider, or empty when the body was unusable.
pub type Body = Map<String, Value>;

/// Outcome of one network call.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptResult {
    pub succeeded: bool,
    pub http_status: u16,
    pub body: Body,
}

impl AttemptResult {
    pub fn new(http_status: u16, body: Body) -> Self {
        Self {
            succeeded: (200..300).contains(&http_status),
            http_status,
            body,
        }
    }

    /// The provider's own `message` field, if it sent a non-empty one.
    pub fn message(&self) -> Option<&str> {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
    }
}

/// Parse a response body, degrading anything that is not a JSON object to an empty map.
pub fn parse_body(text: &str) -> Body {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            debug!("Response body is not a JSON object, using empty body");
            Body::new()
        }
        Err(e) => {
            if !text.trim().is_empty() {
                let preview = &text[..floor_char_boundary(text, MAX_LOGGED_BODY_LENGTH)];
                warn!(error = %e, body = preview, "Failed to parse response body, using empty body");
            }
            Body::new()
        }
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Sends one login request to one provider target.
#[async_trait]
pub trait LoginTransport: Send + Sync {
    async fn post_login(
        &self,
        target: &ProviderTarget,
        credentials: &Credentials,
    ) -> Result<AttemptResult, ApiError>;
}

#[async_trait]
impl<T: LoginTransport + ?Sized> LoginTransport for Arc<T> {
    async fn post_login(
        &self,
        target: &ProviderTarget,
        credentials: &Credentials,
    ) -> Result<AttemptResult, ApiError> {
        self.as_ref().post_login(target, credentials).await
    }
}

/// Login transport over HTTP.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gatehouse/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LoginTransport for HttpTransport {
    async fn post_login(
        &self,
        target: &ProviderTarget,
        credentials: &Credentials,
    ) -> Result<AttemptResult, ApiError> {
        let url = target.url();
        reqwest::Url::parse(&url)
            .map_err(|e| ApiError::InvalidRequest(format!("{}: {}", url, e)))?;

        debug!(url = %url, route = %target.route_kind, "Sending login request");

        let request = LoginRequest {
            email: &credentials.identifier,
            password: credentials.secret.expose_secret(),
        };

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        debug!(url = %url, status, "Login response received");

        Ok(AttemptResult::new(status, parse_body(&text)))
    }
}
