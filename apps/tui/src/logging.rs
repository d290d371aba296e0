use std::fs::OpenOptions;
use std::sync::Mutex;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
///
/// The interactive UI owns the terminal, so events go to the log file there.
/// Headless runs log to stderr, keeping stdout for the report.
pub fn init_tracing(config: &AppConfig, headless: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter()))
        .wrap_err("invalid log filter")?;

    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| eyre!("failed to install logger: {e}"))?;
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .wrap_err_with(|| format!("cannot open log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| eyre!("failed to install logger: {e}"))?;
    Ok(())
}
