//! Plugin lifecycle: settings load/save and the command registry.
//!
//! # Lifecycle
//!
//! 1. [`Plugin::on_load`] — load settings (defaults when nothing is stored
//!    or the stored data is unreadable), register `correct-current-line`.
//! 2. [`Plugin::run_command`] — dispatch a registered command against the
//!    host's active view.
//! 3. [`Plugin::on_unload`] — drop registered commands.
//!
//! ```rust,no_run
//! use talon_corrector::config::TomlSettingsStore;
//! use talon_corrector::host::{FileView, Position};
//! use talon_corrector::plugin::{Plugin, CORRECT_CURRENT_LINE};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let mut plugin = Plugin::new(Box::new(TomlSettingsStore::platform_default()));
//!     plugin.on_load();
//!
//!     let mut view = FileView::new("notes.md", Position::new(3, 0));
//!     plugin.run_command(CORRECT_CURRENT_LINE.id, &mut view).await?;
//!     Ok(())
//! }
//! ```

pub mod command;

pub use command::{correct_current_line, CommandError, CommandOutcome};

use std::sync::Arc;

use anyhow::Result;

use crate::config::{Settings, SettingsStore};
use crate::host::EditorView;
use crate::llm::{CompletionApi, Corrector};

/// A command the plugin exposes to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub id: &'static str,
    pub name: &'static str,
}

pub const CORRECT_CURRENT_LINE: CommandSpec = CommandSpec {
    id: "correct-current-line",
    name: "Ask an LLM to correct the current line",
};

pub struct Plugin {
    store: Box<dyn SettingsStore>,
    settings: Settings,
    commands: Vec<CommandSpec>,
    api: Option<Arc<dyn CompletionApi>>,
}

impl Plugin {
    /// Plugin using the HTTP completion client built from its settings.
    pub fn new(store: Box<dyn SettingsStore>) -> Self {
        Self {
            store,
            settings: Settings::default(),
            commands: Vec::new(),
            api: None,
        }
    }

    /// Plugin using `api` for completions instead of HTTP.
    pub fn with_api(store: Box<dyn SettingsStore>, api: Arc<dyn CompletionApi>) -> Self {
        Self {
            api: Some(api),
            ..Self::new(store)
        }
    }

    /// Load settings and register commands.
    ///
    /// Settings that cannot be read or parsed are replaced by defaults with a
    /// warning, so a broken file never keeps the command from registering.
    pub fn on_load(&mut self) {
        if let Err(e) = self.load_settings() {
            log::warn!("Failed to load settings ({e}); using defaults");
            self.settings = Settings::default();
        }
        self.commands = vec![CORRECT_CURRENT_LINE];
        log::info!(
            "plugin loaded ({} command(s), api key {})",
            self.commands.len(),
            if self.settings.has_api_key() { "set" } else { "missing" }
        );
    }

    pub fn on_unload(&mut self) {
        self.commands.clear();
        log::info!("plugin unloaded");
    }

    /// Commands currently registered with the host.
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Replace the in-memory settings with what the store holds, or with
    /// defaults when it holds nothing.
    pub fn load_settings(&mut self) -> Result<()> {
        self.settings = self.store.load_data()?.unwrap_or_default();
        Ok(())
    }

    pub fn save_settings(&self) -> Result<()> {
        self.store.save_data(&self.settings)
    }

    /// Set the API key and persist it.
    pub fn set_api_key(&mut self, key: &str) -> Result<()> {
        self.settings.set_api_key(key);
        self.save_settings()
    }

    /// Corrector reflecting the current settings.
    pub fn corrector(&self) -> Corrector {
        match &self.api {
            Some(api) => Corrector::new(Arc::clone(api), self.settings.completion.clone()),
            None => Corrector::from_settings(&self.settings),
        }
    }

    /// Run the registered command `id` against `view`.
    pub async fn run_command(
        &self,
        id: &str,
        view: &mut dyn EditorView,
    ) -> Result<CommandOutcome, CommandError> {
        if !self.commands.iter().any(|c| c.id == id) {
            return Err(CommandError::UnknownCommand(id.to_string()));
        }
        match id {
            id if id == CORRECT_CURRENT_LINE.id => {
                correct_current_line(&self.corrector(), view).await
            }
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}
