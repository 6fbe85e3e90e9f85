//! Authentication module: the admin login fallback flow.
//!
//! This module provides:
//! - `LoginOrchestrator`: sequences attempts across the privileged and
//!   standard providers
//! - `normalize`: turns a provider's success body into a `SessionRecord`
//! - `LoginFlow`: persists the session, notifies, and redirects
//!
//! Credentials live for one submit and are never stored.

pub mod credentials;
pub mod error;
pub mod flow;
pub mod normalize;
pub mod orchestrator;
pub mod session;

pub use credentials::Credentials;
pub use error::{LoginError, GENERIC_FAILURE_MESSAGE, INCORRECT_CREDENTIALS_MESSAGE};
pub use flow::{LoginFlow, LoginOutcome};
pub use normalize::{extract_identity, extract_token, normalize};
pub use orchestrator::{Authenticated, LoginOrchestrator, LoginState, Stage};
pub use session::{Identity, SessionRecord};
