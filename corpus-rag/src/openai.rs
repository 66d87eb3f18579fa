//! OpenAI embedding provider using the OpenAI embeddings API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default OpenAI embeddings API endpoint.
const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// The default embedding model.
const DEFAULT_MODEL: &str = "text-embedding-ada-002";

/// The dimensionality of `text-embedding-ada-002` vectors.
const DEFAULT_DIMENSIONS: usize = 1536;

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings API.
///
/// Uses `reqwest` to call the `/v1/embeddings` endpoint directly. Service
/// errors propagate as [`RagError::Embedding`]; there is no retry and no
/// backoff.
///
/// # Example
///
/// ```rust,ignore
/// use corpus_rag::openai::OpenAiEmbeddingProvider;
///
/// let provider = OpenAiEmbeddingProvider::new("sk-...")?;
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), 1536);
/// ```
pub struct OpenAiEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
    url: String,
}

impl OpenAiEmbeddingProvider {
    /// Create a new provider with the given API key.
    ///
    /// Uses the default model (`text-embedding-ada-002`, 1536 dimensions).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Embedding {
                provider: "OpenAI".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            url: OPENAI_EMBEDDINGS_URL.into(),
        })
    }

    /// Create a new provider using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| RagError::Embedding {
            provider: "OpenAI".into(),
            message: "OPENAI_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    /// Set the model name and its output dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }

    /// Point the provider at an OpenAI-compatible embeddings endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "OpenAI", text_len = text.len(), "embedding single text");

        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RagError::Embedding {
            provider: "OpenAI".into(),
            message: "API returned empty response".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = "OpenAI",
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let request_body = EmbeddingRequest { model: &self.model, input: texts.to_vec() };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "embedding request failed");
                RagError::Embedding {
                    provider: "OpenAI".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "OpenAI", %status, "embedding API error");
            return Err(RagError::Embedding {
                provider: "OpenAI".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = "OpenAI", error = %e, "failed to parse embedding response");
            RagError::Embedding {
                provider: "OpenAI".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(embedding_response.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
