//! Operational helpers: logging setup.

use std::{
    fs::{File, OpenOptions},
    path::Path,
    sync::Mutex,
};

use gambit_types::{config::OpsConfig, GambitError, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// Logs go to `ops.log_file` when configured. Without a log file they go to
/// stderr, unless `interactive` is set: a full-screen terminal UI owns the
/// screen, so logging stays off in that case.
pub fn init_tracing(config: &OpsConfig, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_new(config.log_level.clone())
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|err| GambitError::Ops(format!("failed to create log filter: {err}")))?;

    match config.log_file.as_deref() {
        Some(path) => {
            let file = open_log_file(path)?;
            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| GambitError::Ops(format!("tracing init error: {err}")))?;
            info!("Logging to {}", path);
        }
        None if interactive => {}
        None => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| GambitError::Ops(format!("tracing init error: {err}")))?;
        }
    }
    Ok(())
}

/// Open `path` for appending, creating parent directories as needed.
pub fn open_log_file(path: &str) -> Result<File> {
    let path = Path::new(path);
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .map_err(|err| GambitError::Ops(format!("failed to create log dir: {err}")))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| {
            GambitError::Ops(format!("failed to open log file {}: {err}", path.display()))
        })
}
