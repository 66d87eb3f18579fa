//! Hosted completion model clients for corpus.
//!
//! This crate provides:
//! - The [`CompletionModel`] trait — prompt in, generated text out
//! - [`openai::OpenAiChatModel`] — the OpenAI chat completions backend

pub mod error;
pub mod openai;

pub use error::{ModelError, Result};
pub use openai::OpenAiChatModel;

use async_trait::async_trait;

/// A single completion call: a rendered prompt and its sampling temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// The full prompt text, sent as one user message.
    pub prompt: String,
    /// Sampling temperature forwarded to the backend.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a new completion request.
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self { prompt: prompt.into(), temperature }
    }
}

/// A hosted model that turns a prompt into generated text.
///
/// Implementations wrap specific completion backends behind a unified
/// async interface. Service failures propagate as [`ModelError`]; there is
/// no retry policy at this layer.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// A human-readable identifier for the backing model.
    fn name(&self) -> &str;

    /// Generate a completion for the given request.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
