//! Display preferences: language and audio mute.
//!
//! The language is persisted through a `PreferenceStore` on every change and
//! read back at startup. Mute lives for the session only.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::catalog::Language;

/// Key under which the language code is stored.
pub const LANGUAGE_KEY: &str = "language";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid preference file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Key-value persistence for preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Preferences kept as a flat JSON object in one file.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    lock: tokio::sync::Mutex<()>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<HashMap<String, String>, PreferenceError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let _guard = self.lock.lock().await;
        let mut values = self.read_all().await?;
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(&values)?;
        tokio::fs::write(&self.path, json).await?;
        debug!("Saved preference {} to {}", key, self.path.display());
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        store
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DisplaySettings {
    pub language: Language,
    pub muted: bool,
}

/// Shared handle on the display settings with change notification.
pub struct Settings {
    store: Arc<dyn PreferenceStore>,
    state: watch::Sender<DisplaySettings>,
}

impl Settings {
    /// Read the stored language. Missing, invalid or unreadable values fall
    /// back to the default language.
    pub async fn load(store: Arc<dyn PreferenceStore>) -> Self {
        let language = match store.get(LANGUAGE_KEY).await {
            Ok(Some(code)) => code.parse().unwrap_or_else(|e| {
                warn!("Ignoring stored language: {}", e);
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(e) => {
                warn!("Failed to read preferences: {}", e);
                Language::default()
            }
        };
        info!("Display language: {}", language);

        let (state, _) = watch::channel(DisplaySettings {
            language,
            muted: false,
        });
        Self { store, state }
    }

    pub fn current(&self) -> DisplaySettings {
        *self.state.borrow()
    }

    pub fn language(&self) -> Language {
        self.state.borrow().language
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplaySettings> {
        self.state.subscribe()
    }

    /// Change and persist the language. Returns `false` if it was already
    /// selected. A failed write is logged; the in-memory value still changes.
    pub async fn set_language(&self, language: Language) -> bool {
        let changed = self.state.send_if_modified(|s| {
            if s.language == language {
                return false;
            }
            s.language = language;
            true
        });
        if !changed {
            return false;
        }

        if let Err(e) = self.store.set(LANGUAGE_KEY, language.code()).await {
            warn!("Failed to persist language {}: {}", language, e);
        }
        true
    }

    /// Flip the mute flag and return the new value.
    pub fn toggle_mute(&self) -> bool {
        let mut muted = false;
        self.state.send_modify(|s| {
            s.muted = !s.muted;
            muted = s.muted;
        });
        muted
    }
}
