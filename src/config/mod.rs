//! Configuration module for the Talon line corrector.
//!
//! Provides [`Settings`] (the persisted plugin settings), [`CompletionConfig`]
//! (endpoint and sampling parameters), [`AppPaths`] for the platform config
//! directory, and the [`SettingsStore`] host contract with TOML and in-memory
//! implementations.

pub mod paths;
pub mod settings;
pub mod store;

pub use paths::AppPaths;
pub use settings::{CompletionConfig, Settings};
pub use store::{MemorySettingsStore, SettingsStore, TomlSettingsStore};
