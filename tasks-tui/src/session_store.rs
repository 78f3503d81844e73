use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
#[cfg(unix)]
use std::{io::Write, os::unix::fs::OpenOptionsExt};

use crate::config::TasksConfig;

pub const TOKEN_KEY: &str = "token";
pub const THEME_KEY: &str = "theme";

/// Small persistent key/value storage, one string per key.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Stores every key as its own file under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(TasksConfig::root_path()?))
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

fn secure_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
            .write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }

    Ok(())
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }

        let value = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value = value.trim().to_string();
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some(value))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key);
        secure_write(&path, value).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

/// Process-local storage for dev mode and tests. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items()?.remove(key);
        Ok(())
    }
}

/// The bearer token of the logged-in user.
#[derive(Clone)]
pub struct SessionStore {
    store: SharedStore,
}

impl SessionStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Stored token, if any. A storage failure counts as logged out.
    pub fn get(&self) -> Option<String> {
        match self.store.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored session");
                None
            }
        }
    }

    pub fn set(&self, token: &str) -> Result<()> {
        self.store.set_item(TOKEN_KEY, token)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove_item(TOKEN_KEY)
    }
}
