//! HTTP side of the login flow.
//!
//! This module provides the endpoint resolver, the `LoginTransport` seam with
//! its reqwest implementation, and the classifier that decides whether a
//! failed privileged attempt means "route absent".

pub mod classify;
pub mod client;
pub mod endpoints;
pub mod error;

pub use classify::{RouteClassifier, RouteRule, RouteSignal, INVALID_ROUTE_SENTINEL};
pub use client::{parse_body, AttemptResult, Body, HttpTransport, LoginTransport};
pub use endpoints::{Endpoints, ProviderTarget, RouteKind};
pub use error::ApiError;
