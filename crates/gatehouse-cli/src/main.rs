//! Gatehouse - admin sign-in from the terminal.
//!
//! Signs in against the privileged login provider (falling back to the
//! standard one), stores the session in both tiers, and lands on the
//! protected route.

mod cli;
mod commands;
mod console;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gatehouse_core::Config;

/// Log file name inside the `--log-file` directory
const LOG_FILE: &str = "gatehouse.log";

/// Initialize the tracing subscriber for logging.
/// The returned guard flushes the log file when dropped.
fn init_tracing(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let matches = cli::new().get_matches();

    let _guard = init_tracing(
        matches.get_count("verbosity"),
        matches.get_one::<String>("log-file").map(Path::new),
    );
    info!("Gatehouse starting");

    let mut config = Config::load()?;
    if let Some(env) = matches.get_one::<String>("env") {
        config.environment = env.parse()?;
    }

    let succeeded = match matches.subcommand() {
        Some(("login", args)) => {
            commands::login(
                &config,
                args.get_one::<String>("email").cloned(),
                args.get_flag("password-stdin"),
            )
            .await?
        }
        Some(("whoami", _)) => commands::whoami(&config).await?,
        Some(("logout", _)) => commands::logout(&config).await?,
        _ => unreachable!("clap requires a subcommand"),
    };

    // Returning lets the appender guard flush the log file.
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
