//! Provider addresses for each login attempt.

use std::fmt;

use crate::config::Environment;

/// Path of the privileged login route, relative to a base address.
const PRIMARY_LOGIN_PATH: &str = "/admin-auth/login";

/// Path of the standard login route, relative to a base address.
const SECONDARY_LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Privileged ("admin") login service.
    Primary,
    /// Standard login service.
    Secondary,
}

impl RouteKind {
    pub fn path(self) -> &'static str {
        match self {
            RouteKind::Primary => PRIMARY_LOGIN_PATH,
            RouteKind::Secondary => SECONDARY_LOGIN_PATH,
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteKind::Primary => write!(f, "primary"),
            RouteKind::Secondary => write!(f, "secondary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTarget {
    pub base_address: String,
    pub route_kind: RouteKind,
}

impl ProviderTarget {
    pub fn new(base_address: impl Into<String>, route_kind: RouteKind) -> Self {
        Self {
            base_address: base_address.into(),
            route_kind,
        }
    }

    /// Full login URL for this target.
    pub fn url(&self) -> String {
        format!(
            "{}{}",
            self.base_address.trim_end_matches('/'),
            self.route_kind.path()
        )
    }
}

/// The three targets a login flow may contact, resolved from the environment.
#[derive(Debug, Clone)]
pub struct Endpoints {
    primary: ProviderTarget,
    primary_fallback: ProviderTarget,
    secondary: ProviderTarget,
}

impl Endpoints {
    pub fn new(
        environment: Environment,
        dev_base_url: impl Into<String>,
        prod_base_url: impl Into<String>,
        fallback_base_url: impl Into<String>,
    ) -> Self {
        let base = match environment {
            Environment::Development => dev_base_url.into(),
            Environment::Production => prod_base_url.into(),
        };
        Self {
            primary: ProviderTarget::new(base.clone(), RouteKind::Primary),
            primary_fallback: ProviderTarget::new(fallback_base_url, RouteKind::Primary),
            secondary: ProviderTarget::new(base, RouteKind::Secondary),
        }
    }

    /// Privileged route on the environment-selected address.
    pub fn primary(&self) -> &ProviderTarget {
        &self.primary
    }

    /// Privileged route on the fixed production address.
    pub fn primary_fallback(&self) -> &ProviderTarget {
        &self.primary_fallback
    }

    /// Standard route on the environment-selected address.
    pub fn secondary(&self) -> &ProviderTarget {
        &self.secondary
    }
}
