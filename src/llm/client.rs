//! Chat-completion wire types, the [`CompletionApi`] seam and its HTTP
//! implementation.
//!
//! [`ApiClient`] calls any OpenAI-compatible `/v1/chat/completions` endpoint
//! (OpenAI, Groq, Together.ai, Ollama in OpenAI mode, LM Studio ...).

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::Settings;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the completion API.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("completion request timed out")]
    Timeout,

    /// The API answered with a non-success status (bad key, quota, ...).
    #[error("completion API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse completion response: {0}")]
    Parse(String),

    /// The response carried no message content.
    #[error("completion API returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Body of a non-streaming chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub stream: bool,
}

// ---------------------------------------------------------------------------
// CompletionApi trait
// ---------------------------------------------------------------------------

/// One chat-completion round trip.
///
/// Implementors return the raw content of the first choice; trimming is the
/// caller's business.  `Send + Sync` so a client can sit behind
/// `Arc<dyn CompletionApi>`.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// HTTP client for an OpenAI-compatible chat-completions endpoint.
///
/// Connection details come from [`Settings`]; nothing is hardcoded here.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    /// Build a client from plugin settings.
    ///
    /// A timeout is only applied when `completion.timeout_secs` is set.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.completion.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: settings.completion.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        }
    }

    /// Full URL of the chat-completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionApi for ApiClient {
    /// POST `request` and return `choices[0].message.content`.
    ///
    /// The `Authorization: Bearer …` header is attached only when an API key
    /// is configured and non-empty.
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let url = self.endpoint();
        log::debug!(
            "POST {url} (model={}, messages={})",
            request.model,
            request.messages.len()
        );

        let mut req = self.client.post(&url).json(request);

        let key = self.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(LlmError::EmptyResponse)
    }
}

/// Pull `error.message` out of an OpenAI-style error body, falling back to
/// the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
