//! Question answering over retrieved context.
//!
//! The [`AnswerEngine`] glues a [`RagPipeline`] to a
//! [`CompletionModel`](corpus_model::CompletionModel): embed the question,
//! retrieve the nearest chunks, render them into a grounded prompt, and ask
//! the model to answer from that context alone.

use std::sync::Arc;

use corpus_model::{CompletionModel, CompletionRequest};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::document::SearchResult;
use crate::error::{RagError, Result};
use crate::pipeline::RagPipeline;

/// Sampling temperature for grounded answers.
const ANSWER_TEMPERATURE: f32 = 0.3;

/// A generated answer plus the source filenames of the chunks it was
/// grounded on, in retrieval rank order (duplicates preserved).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The generated answer text.
    pub answer: String,
    /// Source identifier of each retrieved chunk, best match first.
    pub sources: Vec<String>,
}

/// Answers questions by retrieving context and calling a completion model.
pub struct AnswerEngine {
    pipeline: Arc<RagPipeline>,
    model: Arc<dyn CompletionModel>,
}

impl AnswerEngine {
    /// Create a new engine over the given pipeline and completion model.
    pub fn new(pipeline: Arc<RagPipeline>, model: Arc<dyn CompletionModel>) -> Self {
        Self { pipeline, model }
    }

    /// Return a reference to the underlying pipeline.
    pub fn pipeline(&self) -> &Arc<RagPipeline> {
        &self.pipeline
    }

    /// Answer a question from the given collection.
    ///
    /// Retrieval returning nothing is not an error: the model is still
    /// called with an empty context block and answers accordingly.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] if retrieval fails and
    /// [`RagError::Completion`] if the model call fails.
    pub async fn ask(&self, collection: &str, question: &str) -> Result<Answer> {
        let results = self.pipeline.query(collection, question).await?;
        let sources: Vec<String> = results.iter().map(|r| r.chunk.source().to_string()).collect();

        let prompt = build_prompt(question, &results);
        let request = CompletionRequest::new(prompt, ANSWER_TEMPERATURE);

        let answer = self.model.complete(&request).await.map_err(|e| {
            error!(model = self.model.name(), error = %e, "completion failed");
            RagError::Completion(e.to_string())
        })?;

        info!(
            collection,
            source_count = sources.len(),
            model = self.model.name(),
            "answered question"
        );

        Ok(Answer { answer, sources })
    }
}

/// Render retrieved chunks and the question into the grounded-answer prompt.
fn build_prompt(question: &str, results: &[SearchResult]) -> String {
    let context =
        results.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join("\n");

    format!(
        "You are a helpful assistant. Answer the user's question using only the context below.\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question:\n\
         {question}\n\
         \n\
         Answer:"
    )
}
