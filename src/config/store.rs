//! Host key-value storage for [`Settings`].
//!
//! The host owns where the settings object lives; the plugin only loads and
//! saves it whole.  [`TomlSettingsStore`] keeps it in a `settings.toml` file,
//! [`MemorySettingsStore`] keeps it in memory for embedding hosts and tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use super::{AppPaths, Settings};

/// Load/save contract for the plugin's persisted data.
pub trait SettingsStore: Send + Sync {
    /// Return the saved settings, or `None` if nothing has been saved yet.
    fn load_data(&self) -> Result<Option<Settings>>;

    /// Persist `settings`, replacing whatever was stored before.
    fn save_data(&self, settings: &Settings) -> Result<()>;
}

// ---------------------------------------------------------------------------
// TomlSettingsStore
// ---------------------------------------------------------------------------

/// Stores settings as a TOML file.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by the platform `settings.toml`.
    pub fn platform_default() -> Self {
        Self::new(AppPaths::new().settings_file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load_data(&self) -> Result<Option<Settings>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Settings::load_from(&self.path).map(Some)
    }

    fn save_data(&self, settings: &Settings) -> Result<()> {
        settings.save_to(&self.path)
    }
}

// ---------------------------------------------------------------------------
// MemorySettingsStore
// ---------------------------------------------------------------------------

/// Keeps the settings object in memory.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    data: Mutex<Option<Settings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `settings`.
    pub fn with_data(settings: Settings) -> Self {
        Self {
            data: Mutex::new(Some(settings)),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load_data(&self) -> Result<Option<Settings>> {
        let data = self
            .data
            .lock()
            .map_err(|_| anyhow!("settings store lock poisoned"))?;
        Ok(data.clone())
    }

    fn save_data(&self, settings: &Settings) -> Result<()> {
        let mut data = self
            .data
            .lock()
            .map_err(|_| anyhow!("settings store lock poisoned"))?;
        *data = Some(settings.clone());
        Ok(())
    }
}
