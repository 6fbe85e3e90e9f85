//! Subcommand actions. Each returns whether the command succeeded.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use gatehouse_core::api::HttpTransport;
use gatehouse_core::auth::{Credentials, LoginFlow, LoginOrchestrator, LoginOutcome};
use gatehouse_core::redirect::RedirectScheduler;
use gatehouse_core::storage::{FileBackend, MemoryBackend, SessionStore, StorageTier};
use gatehouse_core::Config;

use crate::console::{ConsoleNavigator, ConsoleNotifier};

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

fn durable_store(config: &Config, ephemeral: MemoryBackend) -> Result<SessionStore> {
    let data_dir = config.data_dir()?;
    debug!(?data_dir, "Data directory configured");
    Ok(SessionStore::new(
        Arc::new(FileBackend::in_dir(&data_dir)),
        Arc::new(ephemeral),
    ))
}

/// Form-level checks that must pass before the flow sees the credentials.
fn check_fields(email: &str, password: &SecretString) -> Result<(), &'static str> {
    let password = password.expose_secret();
    if email.is_empty() || password.is_empty() {
        return Err("Email and password required");
    }
    if email.len() > MAX_EMAIL_LENGTH || !email.contains('@') {
        return Err("Enter a valid email address");
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err("Password is too long");
    }
    Ok(())
}

fn prompt_email() -> Result<String> {
    print!("Email: ");
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    Ok(email.trim().to_string())
}

fn read_password(from_stdin: bool) -> Result<SecretString> {
    let password = if from_stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read password from stdin")?;
        line.trim_end_matches(['\r', '\n']).to_string()
    } else {
        rpassword::prompt_password("Password: ")?
    };
    Ok(SecretString::from(password))
}

pub async fn login(config: &Config, email: Option<String>, password_stdin: bool) -> Result<bool> {
    let email = match email {
        Some(email) => email.trim().to_string(),
        None => prompt_email()?,
    };
    let password = read_password(password_stdin)?;

    if let Err(message) = check_fields(&email, &password) {
        eprintln!("✗ {}", message);
        return Ok(false);
    }

    let ephemeral = MemoryBackend::ephemeral();
    let store = durable_store(config, ephemeral.clone())?;
    let transport = HttpTransport::new(config.request_timeout())?;
    let orchestrator = LoginOrchestrator::new(transport, config.endpoints(), config.request_timeout());
    let navigator = Arc::new(ConsoleNavigator::new(config.data_dir()?, ephemeral));
    let redirect = RedirectScheduler::new(navigator, config.redirect_route.clone(), config.redirect_delay());
    let flow = LoginFlow::new(orchestrator, store, Arc::new(ConsoleNotifier), redirect);

    println!("Signing in as {}...", email);
    let credentials = Credentials::new(email, password.expose_secret());
    let outcome = flow.submit(credentials).await;
    Ok(matches!(outcome, LoginOutcome::Succeeded { .. }))
}

pub async fn whoami(config: &Config) -> Result<bool> {
    let store = durable_store(config, MemoryBackend::ephemeral())?;
    match store.read_tier(StorageTier::Durable).await? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(record.identity())?);
            Ok(true)
        }
        None => {
            eprintln!("Not signed in");
            Ok(false)
        }
    }
}

pub async fn logout(config: &Config) -> Result<bool> {
    let store = durable_store(config, MemoryBackend::ephemeral())?;
    store.clear().await?;
    println!("Signed out");
    Ok(true)
}
