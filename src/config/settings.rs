//! Plugin settings, defaults and TOML persistence.
//!
//! Both structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they round-trip through `settings.toml` and can be handed to the
//! completion client by value.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CompletionConfig
// ---------------------------------------------------------------------------

/// Endpoint and sampling parameters for the completion API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of an OpenAI-compatible API, without the `/v1/...` suffix.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature (0.0 – 2.0).  Kept low so the model edits rather
    /// than rewrites.
    pub temperature: f32,
    /// Upper bound on the length of the corrected line.
    pub max_tokens: u32,
    /// Nucleus sampling cut-off.
    pub top_p: f32,
    /// Per-request timeout.  `None` waits for as long as the server takes.
    pub timeout_secs: Option<u64>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            model: "gpt-4o-mini".into(),
            temperature: 0.2,
            max_tokens: 256,
            top_p: 1.0,
            timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Settings  (top-level)
// ---------------------------------------------------------------------------

/// Persisted plugin settings, serialised as `settings.toml`.
///
/// A file holding only `api_key = "..."` is valid; every other field falls
/// back to its default.
///
/// ```rust,no_run
/// use talon_corrector::config::{AppPaths, Settings};
///
/// let path = AppPaths::new().settings_file;
/// let mut settings = Settings::load_from(&path).unwrap();
/// settings.set_api_key("sk-...");
/// settings.save_to(&path).unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Credential for the completion API.  `None` until the user sets one.
    pub api_key: Option<String>,
    /// Completion endpoint parameters.
    pub completion: CompletionConfig,
}

impl Settings {
    /// Replace the stored credential.  An empty string clears it.
    pub fn set_api_key(&mut self, key: &str) {
        let key = key.trim();
        self.api_key = if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        };
    }

    /// `true` when a non-empty credential is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Load from `path`, returning `Ok(Settings::default())` when the file
    /// does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
