use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "tasks-tui";
const ENV_PREFIX: &str = "TASKS_TUI";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Base URL of the tasks backend, e.g. "http://localhost:5000"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Filter used for the log file when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            log_level: default_log_level(),
        }
    }
}

impl TasksConfig {
    /// Directory holding the config file, the stored session and the log file.
    pub fn root_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join(APP_DIR))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::root_path()?.join("config.toml"))
    }

    /// Load config from disk, then apply `TASKS_TUI_*` environment overrides.
    /// A missing file means defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(path)
    }

    fn load_from(path: PathBuf) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.clone()).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).prefix_separator("_"))
            .build()
            .with_context(|| format!("Failed to read config at {}", path.display()))?;

        settings
            .try_deserialize::<Self>()
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(())
    }
}
