//! Response normalization.
//!
//! Providers disagree on where they put the token and the identity. Each is
//! looked up with an ordered list of extraction rules; the first rule that
//! yields a usable value wins.

use serde_json::Value;

use super::{Identity, SessionRecord};
use crate::api::{Body, RouteKind};

/// A path of nested object keys inside a response body.
type FieldPath = &'static [&'static str];

const TOKEN_RULES: &[FieldPath] = &[&["token"], &["data", "access_token"]];

const PRIMARY_IDENTITY_RULES: &[FieldPath] = &[&["admin"]];

const SECONDARY_IDENTITY_RULES: &[FieldPath] = &[&["admin"], &["user"], &["data", "user"]];

fn lookup<'a>(body: &'a Body, path: FieldPath) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(body.get(*first)?, |value, key| value.as_object()?.get(*key))
}

/// First non-empty string token, `token` before `data.access_token`.
pub fn extract_token(body: &Body) -> Option<String> {
    TOKEN_RULES.iter().find_map(|path| {
        lookup(body, path)
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

/// First object-valued identity field for the provider, else an empty map.
pub fn extract_identity(body: &Body, provider: RouteKind) -> Identity {
    let rules = match provider {
        RouteKind::Primary => PRIMARY_IDENTITY_RULES,
        RouteKind::Secondary => SECONDARY_IDENTITY_RULES,
    };
    rules
        .iter()
        .find_map(|path| lookup(body, path).and_then(Value::as_object).cloned())
        .unwrap_or_default()
}

/// Build the canonical session from a success body, or `None` when no token is present.
pub fn normalize(body: &Body, provider: RouteKind) -> Option<SessionRecord> {
    let token = extract_token(body)?;
    SessionRecord::new(token, extract_identity(body, provider))
}
