//! Application configuration management.
//!
//! This module handles loading the login configuration: which environment
//! the client runs against, the base addresses of the login providers, the
//! redirect target and where the durable session tier lives.
//!
//! Configuration is stored at `~/.config/gatehouse/config.json`. Every field
//! can be overridden with a `GATEHOUSE_*` environment variable.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::Endpoints;

/// Application name used for config/data directory paths
const APP_NAME: &str = "gatehouse";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_DEV_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_PROD_BASE_URL: &str = "https://api.gatehouse.app/api";
const DEFAULT_REDIRECT_ROUTE: &str = "/admin/dashboard";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Delay between the success notification and the full navigation.
const DEFAULT_REDIRECT_DELAY_MS: u64 = 1000;

/// Which deployment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(anyhow::anyhow!("Unknown environment: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub environment: Environment,
    pub dev_base_url: String,
    pub prod_base_url: String,
    /// Defaults to `prod_base_url` when unset.
    pub fallback_base_url: Option<String>,
    pub request_timeout_secs: u64,
    pub redirect_route: String,
    pub redirect_delay_ms: u64,
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            dev_base_url: DEFAULT_DEV_BASE_URL.to_string(),
            prod_base_url: DEFAULT_PROD_BASE_URL.to_string(),
            fallback_base_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            redirect_route: DEFAULT_REDIRECT_ROUTE.to_string(),
            redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
            data_dir: None,
        }
    }
}

impl Config {
    /// Load config from disk (defaults if absent), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `GATEHOUSE_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup("GATEHOUSE_ENV") {
            self.environment = env.parse()?;
        }
        if let Some(url) = lookup("GATEHOUSE_DEV_BASE_URL") {
            self.dev_base_url = url;
        }
        if let Some(url) = lookup("GATEHOUSE_PROD_BASE_URL") {
            self.prod_base_url = url;
        }
        if let Some(url) = lookup("GATEHOUSE_FALLBACK_BASE_URL") {
            self.fallback_base_url = Some(url);
        }
        if let Some(secs) = lookup("GATEHOUSE_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = secs
                .parse()
                .context("GATEHOUSE_REQUEST_TIMEOUT_SECS must be a number of seconds")?;
        }
        if let Some(route) = lookup("GATEHOUSE_REDIRECT_ROUTE") {
            self.redirect_route = route;
        }
        if let Some(ms) = lookup("GATEHOUSE_REDIRECT_DELAY_MS") {
            self.redirect_delay_ms = ms
                .parse()
                .context("GATEHOUSE_REDIRECT_DELAY_MS must be a number of milliseconds")?;
        }
        if let Some(dir) = lookup("GATEHOUSE_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the durable session tier.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn endpoints(&self) -> Endpoints {
        let fallback = self
            .fallback_base_url
            .clone()
            .unwrap_or_else(|| self.prod_base_url.clone());
        Endpoints::new(
            self.environment,
            self.dev_base_url.clone(),
            self.prod_base_url.clone(),
            fallback,
        )
    }
}
