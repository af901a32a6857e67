//! Command-line host for the Talon line corrector.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse arguments and pick the settings store (`--config` or the
//!    platform `settings.toml`).
//! 3. Load the plugin, which registers `correct-current-line`.
//! 4. Run the requested subcommand on a current-thread tokio runtime.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use talon_corrector::{
    config::{SettingsStore, TomlSettingsStore},
    host::{EditorView, FileView, Position},
    plugin::{CommandOutcome, Plugin, CORRECT_CURRENT_LINE},
};

#[derive(Parser)]
#[command(name = "talon-corrector")]
#[command(about = "Ask an LLM to correct a dictated line")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API key for this run only; not saved
    #[arg(long, global = true, env = "TALON_CORRECTOR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correct one line of a file and insert the result below it
    #[command(after_help = "\
Examples:
  talon-corrector correct notes.md --line 12
  talon-corrector correct notes.md --line 12 --dry-run")]
    Correct {
        /// File to edit
        file: PathBuf,

        /// Line to correct (1-based)
        #[arg(long, short = 'l', value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,

        /// Print the correction without modifying the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect or change stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Store the completion API key
    SetKey { key: String },
    /// Print the current settings (API key masked)
    Show,
    /// Print the settings file location
    Path,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let store = settings_store(cli.config.as_deref());

    match cli.command {
        Commands::Config { action } => {
            if let Some(output) = run_config(&store, action)? {
                println!("{output}");
            }
        }
        Commands::Correct {
            file,
            line,
            dry_run,
        } => {
            let mut plugin = Plugin::new(Box::new(store));
            load_plugin(&mut plugin, cli.api_key.as_deref());

            let cursor = Position::new(usize::try_from(line - 1)?, 0);
            let mut view = FileView::new(&file, cursor);

            let result = if dry_run {
                preview(&plugin, &view).await
            } else {
                apply(&plugin, &mut view).await
            };
            plugin.on_unload();
            println!("{}", result?);
        }
    }
    Ok(())
}

/// `--config` when given, the platform `settings.toml` otherwise.
fn settings_store(config: Option<&Path>) -> TomlSettingsStore {
    match config {
        Some(path) => TomlSettingsStore::new(path),
        None => TomlSettingsStore::platform_default(),
    }
}

/// Run the load hook, then apply a per-run API key on top of stored settings.
fn load_plugin(plugin: &mut Plugin, api_key: Option<&str>) {
    plugin.on_load();
    if let Some(key) = api_key {
        plugin.settings_mut().set_api_key(key);
    }
    if !plugin.settings().has_api_key() {
        log::warn!("no API key configured; run `talon-corrector config set-key <KEY>`");
    }
}

/// Run `correct-current-line` against the file and return the inserted line.
async fn apply(plugin: &Plugin, view: &mut FileView) -> Result<String> {
    match plugin.run_command(CORRECT_CURRENT_LINE.id, view).await? {
        CommandOutcome::NoActiveFile => {
            bail!("{} is not a readable file", view.path().display())
        }
        CommandOutcome::Inserted { at, text } => {
            log::info!("wrote correction to {} line {}", view.path().display(), at.line + 1);
            Ok(text.trim().to_string())
        }
    }
}

/// Ask for the correction without touching the file.
async fn preview(plugin: &Plugin, view: &FileView) -> Result<String> {
    let Some(contents) = view.file_contents()? else {
        bail!("{} is not a readable file", view.path().display());
    };
    let corrected = plugin
        .corrector()
        .correct_line(&contents, view.cursor().line)
        .await?;
    Ok(corrected)
}

/// Apply a `config` action; returns what should be printed, if anything.
fn run_config(store: &TomlSettingsStore, action: ConfigAction) -> Result<Option<String>> {
    let output = match action {
        ConfigAction::SetKey { key } => {
            let mut settings = store.load_data()?.unwrap_or_default();
            settings.set_api_key(&key);
            store.save_data(&settings)?;
            log::info!("API key saved to {}", store.path().display());
            None
        }
        ConfigAction::Show => {
            let mut settings = store.load_data()?.unwrap_or_default();
            settings.api_key = settings.api_key.as_deref().map(mask_key);
            Some(toml::to_string_pretty(&settings)?.trim_end().to_string())
        }
        ConfigAction::Path => Some(store.path().display().to_string()),
    };
    Ok(output)
}

/// Keep the first and last four characters of a key visible.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clap::CommandFactory;
    use std::sync::Arc;
    use talon_corrector::config::{MemorySettingsStore, Settings};
    use talon_corrector::llm::{ChatRequest, CompletionApi, LlmError};
    use tempfile::tempdir;

    struct Reply(&'static str);

    #[async_trait]
    impl CompletionApi for Reply {
        async fn complete(&self, _request: &ChatRequest) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    fn loaded_plugin(reply: &'static str) -> Plugin {
        let mut plugin = Plugin::with_api(
            Box::new(MemorySettingsStore::new()),
            Arc::new(Reply(reply)),
        );
        load_plugin(&mut plugin, Some("sk-test"));
        plugin
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn mask_key_hides_the_middle() {
        assert_eq!(mask_key("sk-abcdefghijkl"), "sk-a...ijkl");
        assert_eq!(mask_key("short"), "*****");
    }

    #[test]
    fn line_must_be_positive() {
        assert!(Cli::try_parse_from(["talon-corrector", "correct", "a.md", "--line", "0"]).is_err());
        assert!(Cli::try_parse_from(["talon-corrector", "correct", "a.md", "--line", "3"]).is_ok());
    }

    #[test]
    fn config_flag_overrides_settings_path() {
        let cli = Cli::try_parse_from([
            "talon-corrector",
            "config",
            "path",
            "--config",
            "/tmp/custom/settings.toml",
        ])
        .unwrap();

        let store = settings_store(cli.config.as_deref());
        assert_eq!(store.path(), Path::new("/tmp/custom/settings.toml"));

        let output = run_config(&store, ConfigAction::Path).unwrap();
        assert_eq!(output.as_deref(), Some("/tmp/custom/settings.toml"));
    }

    #[test]
    fn set_key_persists_through_toml_store() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        let store = settings_store(Some(path.as_path()));

        let output = run_config(
            &store,
            ConfigAction::SetKey {
                key: "sk-abcdefghijkl".into(),
            },
        )
        .unwrap();
        assert!(output.is_none());

        let saved = Settings::load_from(&path).expect("load");
        assert_eq!(saved.api_key.as_deref(), Some("sk-abcdefghijkl"));
    }

    #[test]
    fn show_masks_the_key() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        let mut settings = Settings::default();
        settings.set_api_key("sk-abcdefghijkl");
        settings.save_to(&path).expect("save");

        let output = run_config(&settings_store(Some(path.as_path())), ConfigAction::Show)
            .unwrap()
            .expect("show prints settings");

        assert!(output.contains("sk-a...ijkl"));
        assert!(!output.contains("sk-abcdefghijkl"));
        assert!(output.contains("[completion]"));
    }

    #[test]
    fn per_run_key_is_not_saved() {
        let store = MemorySettingsStore::new();
        let mut plugin = Plugin::new(Box::new(store));
        load_plugin(&mut plugin, Some("sk-once"));

        assert_eq!(plugin.settings().api_key.as_deref(), Some("sk-once"));
        plugin.load_settings().unwrap();
        assert!(plugin.settings().api_key.is_none());
    }

    #[tokio::test]
    async fn apply_inserts_below_the_line() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("note.md");
        std::fs::write(&path, "foo\nbar\nbaz\n").expect("write");

        let plugin = loaded_plugin("Bar.");
        let mut view = FileView::new(&path, Position::new(1, 0));
        let inserted = apply(&plugin, &mut view).await.unwrap();

        assert_eq!(inserted, "Bar.");
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "foo\nbar\nBar.\nbaz\n"
        );
    }

    #[tokio::test]
    async fn preview_leaves_file_byte_identical() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("note.md");
        let original = "foo\r\nbar\r\nbaz";
        std::fs::write(&path, original).expect("write");

        let plugin = loaded_plugin("  Bar.\n");
        let view = FileView::new(&path, Position::new(1, 0));
        let corrected = preview(&plugin, &view).await.unwrap();

        assert_eq!(corrected, "Bar.");
        assert_eq!(std::fs::read(&path).unwrap(), original.as_bytes());
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("missing.md");
        let plugin = loaded_plugin("unused");

        let mut view = FileView::new(&path, Position::default());
        assert!(apply(&plugin, &mut view).await.is_err());
        assert!(preview(&plugin, &view).await.is_err());
        assert!(!path.exists());
    }
}
