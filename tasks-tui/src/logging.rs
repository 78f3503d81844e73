use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::TasksConfig;

const LOG_FILE: &str = "tasks-tui.log";

pub fn log_path() -> Result<PathBuf> {
    Ok(TasksConfig::root_path()?.join(LOG_FILE))
}

/// Send tracing output to the log file; the terminal belongs to the UI.
/// `RUST_LOG` wins over the configured level.
pub fn init(cfg: &TasksConfig) -> Result<PathBuf> {
    let path = log_path()?;
    init_at(&path, &cfg.log_level)?;
    Ok(path)
}

fn init_at(path: &Path, default_level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log_level filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_ansi(false)
        .try_init();

    if let Err(err) = init_result {
        tracing::debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
