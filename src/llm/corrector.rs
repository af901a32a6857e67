//! The correction request: tag the line, build the prompt, make one call.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{CompletionConfig, Settings};
use crate::llm::client::{ApiClient, ChatMessage, ChatRequest, CompletionApi, LlmError};
use crate::llm::prompt::{PromptBuilder, PromptError};

// ---------------------------------------------------------------------------
// CorrectionError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CorrectionError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

// ---------------------------------------------------------------------------
// Corrector
// ---------------------------------------------------------------------------

/// Asks the completion API for a corrected version of one document line.
///
/// ```rust,no_run
/// use talon_corrector::config::{SettingsStore, TomlSettingsStore};
/// use talon_corrector::llm::Corrector;
///
/// #[tokio::main]
/// async fn main() {
///     let settings = TomlSettingsStore::platform_default()
///         .load_data()
///         .unwrap()
///         .unwrap_or_default();
///     let corrector = Corrector::from_settings(&settings);
///     let fixed = corrector.correct_line("foo\nbar\nbaz", 1).await.unwrap();
///     println!("{fixed}");
/// }
/// ```
#[derive(Clone)]
pub struct Corrector {
    api: Arc<dyn CompletionApi>,
    config: CompletionConfig,
    prompt_builder: PromptBuilder,
}

impl Corrector {
    /// Corrector over any [`CompletionApi`], e.g. a stub in tests.
    pub fn new(api: Arc<dyn CompletionApi>, config: CompletionConfig) -> Self {
        Self {
            api,
            config,
            prompt_builder: PromptBuilder::new(),
        }
    }

    /// Corrector talking HTTP to the endpoint configured in `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Arc::new(ApiClient::from_settings(settings)),
            settings.completion.clone(),
        )
    }

    /// Build the non-streaming chat request for `line` of `document`.
    pub fn build_request(&self, document: &str, line: usize) -> Result<ChatRequest, PromptError> {
        let (system_msg, user_msg) = self.prompt_builder.build_chat(document, line)?;
        Ok(ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(system_msg), ChatMessage::user(user_msg)],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            top_p: self.config.top_p,
            stream: false,
        })
    }

    /// Return the model's corrected version of `line`, whitespace-trimmed.
    ///
    /// Errors from the API propagate unchanged; there is no retry.  A reply
    /// that is blank after trimming is [`LlmError::EmptyResponse`].
    pub async fn correct_line(&self, document: &str, line: usize) -> Result<String, CorrectionError> {
        let request = self.build_request(document, line)?;
        let content = self.api.complete(&request).await?;

        let corrected = content.trim();
        if corrected.is_empty() {
            return Err(LlmError::EmptyResponse.into());
        }
        Ok(corrected.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
