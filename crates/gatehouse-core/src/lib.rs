//! Gatehouse core - admin login with provider fallback and dual-tier sessions.
//!
//! A login submit runs through the [`auth::LoginFlow`]: the privileged
//! provider is tried on the environment address and then on the production
//! address, the standard provider last; the first success is normalized into
//! a [`auth::SessionRecord`], written to both [`storage`] tiers, and handed to
//! the [`redirect`] scheduler.

pub mod api;
pub mod auth;
pub mod config;
pub mod redirect;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Config, Environment};
