//! LLM correction module.
//!
//! This module provides:
//! * [`tag_line`] / [`PromptBuilder`] — marks the dictated line and builds the
//!   two-message chat prompt.
//! * [`CompletionApi`] — the one-method seam over the completion endpoint.
//! * [`ApiClient`] — OpenAI-compatible HTTP implementation of that seam.
//! * [`Corrector`] — tag, prompt, call, trim.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use talon_corrector::config::{SettingsStore, TomlSettingsStore};
//! use talon_corrector::llm::Corrector;
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = TomlSettingsStore::platform_default()
//!         .load_data()
//!         .unwrap()
//!         .unwrap_or_default();
//!     let corrector = Corrector::from_settings(&settings);
//!
//!     let document = "# Groceries\nbye milk and bred\n";
//!     let corrected = corrector.correct_line(document, 1).await.unwrap();
//!     println!("{corrected}");
//! }
//! ```

pub mod client;
pub mod corrector;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiClient, ChatMessage, ChatRequest, CompletionApi, LlmError};
pub use corrector::{CorrectionError, Corrector};
pub use prompt::{line_count, tag_line, PromptBuilder, PromptError, SENTINEL};
