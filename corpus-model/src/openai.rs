//! OpenAI chat-completion client.
//!
//! Calls the `/v1/chat/completions` endpoint directly with `reqwest`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::{CompletionModel, CompletionRequest};

/// The default OpenAI chat completions endpoint.
const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The default chat model.
const DEFAULT_MODEL: &str = "gpt-4";

/// A [`CompletionModel`] backed by the OpenAI chat completions API.
///
/// The prompt is sent as a single user message; the first choice's message
/// content is returned verbatim.
///
/// # Example
///
/// ```rust,ignore
/// use corpus_model::openai::OpenAiChatModel;
///
/// let model = OpenAiChatModel::new("sk-...")?;
/// let answer = model.complete(&CompletionRequest::new("say hi", 0.3)).await?;
/// ```
pub struct OpenAiChatModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl OpenAiChatModel {
    /// Create a new client with the given API key and the default model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ModelError::Config("API key must not be empty".into()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            url: OPENAI_CHAT_COMPLETIONS_URL.into(),
        })
    }

    /// Create a new client using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ModelError::Config("OPENAI_API_KEY environment variable not set".into())
        })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `gpt-4o-mini`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at an OpenAI-compatible chat completions endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── CompletionModel implementation ─────────────────────────────────

#[async_trait]
impl CompletionModel for OpenAiChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        debug!(
            model = %self.model,
            prompt_len = request.prompt.len(),
            temperature = request.temperature,
            "requesting completion"
        );

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: &request.prompt }],
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "completion request failed");
                ModelError::Request(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(model = %self.model, %status, "completion API error");
            return Err(ModelError::Api { status: status.as_u16(), message: detail });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(model = %self.model, error = %e, "failed to parse completion response");
            ModelError::Parse(e.to_string())
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ModelError::Parse("API returned no choices".into()))
    }
}
