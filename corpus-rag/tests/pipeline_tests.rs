//! End-to-end tests of the ingest → retrieve → answer flow, using a
//! deterministic embedder and a scripted completion model so no network
//! access is required.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use corpus_model::{CompletionModel, CompletionRequest, ModelError};
use corpus_rag::{
    AnswerEngine, Document, EmbeddingProvider, InMemoryVectorStore, RagConfig, RagPipeline,
    SentenceChunker,
};
use tokio::sync::Mutex;

/// Deterministic hash-based embeddings: identical text always maps to the
/// same unit vector, so an exact-text query is its own nearest neighbor.
struct MockEmbeddingProvider {
    dimensions: usize,
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> corpus_rag::Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Returns a canned answer and records the request it was given.
struct ScriptedModel {
    reply: String,
    seen: Mutex<Option<CompletionRequest>>,
}

impl ScriptedModel {
    fn new(reply: &str) -> Self {
        Self { reply: reply.to_string(), seen: Mutex::new(None) }
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        *self.seen.lock().await = Some(request.clone());
        Ok(self.reply.clone())
    }
}

fn pipeline(config: RagConfig) -> Arc<RagPipeline> {
    let max_words = config.max_words;
    Arc::new(
        RagPipeline::builder()
            .config(config)
            .embedding_provider(Arc::new(MockEmbeddingProvider { dimensions: 64 }))
            .vector_store(Arc::new(InMemoryVectorStore::new()))
            .chunker(Arc::new(SentenceChunker::new(max_words)))
            .build()
            .unwrap(),
    )
}

fn document(id: &str, filename: &str, text: &str) -> Document {
    Document {
        id: id.to_string(),
        text: text.to_string(),
        metadata: HashMap::from([("filename".to_string(), filename.to_string())]),
        source_uri: Some(format!("uploads/{filename}")),
    }
}

/// 1200 words in 120 ten-word sentences.
fn twelve_hundred_words() -> String {
    let sentence = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
    vec![sentence; 120].join(". ")
}

#[tokio::test]
async fn ingesting_a_1200_word_document_stores_three_chunks() {
    let pipeline = pipeline(RagConfig::default());
    pipeline.create_collection("docs").await.unwrap();

    let chunks = pipeline
        .ingest("docs", &document("sha1200", "essay.txt", &twelve_hundred_words()))
        .await
        .unwrap();

    assert_eq!(chunks.len(), 3);
    for chunk in &chunks {
        assert_eq!(chunk.embedding.len(), 64);
        assert_eq!(chunk.document_id, "sha1200");
    }
}

#[tokio::test]
async fn querying_with_a_chunks_exact_text_returns_its_source_first() {
    let config = RagConfig::builder().max_words(8).top_k(4).build().unwrap();
    let pipeline = pipeline(config);
    pipeline.create_collection("docs").await.unwrap();

    // Three sentences, each its own chunk under the 8-word budget.
    let text = "the sky is blue today. fish swim in deep water. mountains rise above the valley";
    let chunks = pipeline.ingest("docs", &document("sha", "nature.txt", &text)).await.unwrap();
    assert_eq!(chunks.len(), 3);

    let results = pipeline.query("docs", &chunks[1].text).await.unwrap();

    assert_eq!(results[0].chunk.id, chunks[1].id);
    assert_eq!(results[0].chunk.source(), "nature.txt");
    assert!((results[0].score - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn query_respects_top_k() {
    let config = RagConfig::builder().max_words(4).top_k(2).build().unwrap();
    let pipeline = pipeline(config);
    pipeline.create_collection("docs").await.unwrap();

    let text = "one sentence here. another sentence there. a third sentence somewhere. a fourth one";
    let chunks = pipeline.ingest("docs", &document("sha", "many.txt", &text)).await.unwrap();
    assert_eq!(chunks.len(), 4);

    let results = pipeline.query("docs", "sentence").await.unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn empty_document_ingests_no_chunks() {
    let pipeline = pipeline(RagConfig::default());
    pipeline.create_collection("docs").await.unwrap();

    let chunks = pipeline.ingest("docs", &document("sha", "empty.txt", "")).await.unwrap();
    assert!(chunks.is_empty());
}

#[tokio::test]
async fn answer_engine_reports_sources_and_grounds_the_prompt() {
    let config = RagConfig::builder().max_words(8).top_k(2).build().unwrap();
    let pipeline = pipeline(config);
    pipeline.create_collection("docs").await.unwrap();

    let text = "the sky is blue today. fish swim in deep water. mountains rise above the valley";
    let chunks = pipeline.ingest("docs", &document("sha", "nature.txt", &text)).await.unwrap();

    let model = Arc::new(ScriptedModel::new("Fish live in water."));
    let engine = AnswerEngine::new(Arc::clone(&pipeline), model.clone());

    let answer = engine.ask("docs", &chunks[1].text).await.unwrap();

    assert_eq!(answer.answer, "Fish live in water.");
    assert_eq!(answer.sources.len(), 2);
    assert_eq!(answer.sources[0], "nature.txt");

    let request = model.seen.lock().await.clone().expect("model was not called");
    assert!(request.prompt.contains(&chunks[1].text));
    assert!(request.prompt.ends_with("Answer:"));
    assert!((request.temperature - 0.3).abs() < f32::EPSILON);
}

#[tokio::test]
async fn answer_engine_still_calls_the_model_on_empty_retrieval() {
    let pipeline = pipeline(RagConfig::default());
    pipeline.create_collection("docs").await.unwrap();

    let model = Arc::new(ScriptedModel::new("I don't know."));
    let engine = AnswerEngine::new(Arc::clone(&pipeline), model.clone());

    let answer = engine.ask("docs", "is anything indexed?").await.unwrap();

    assert_eq!(answer.answer, "I don't know.");
    assert!(answer.sources.is_empty());
    assert!(model.seen.lock().await.is_some());
}

#[tokio::test]
async fn reingesting_identical_content_does_not_duplicate() {
    let config = RagConfig::builder().max_words(4).top_k(10).build().unwrap();
    let pipeline = pipeline(config);
    pipeline.create_collection("docs").await.unwrap();

    let doc = document("samesha", "dup.txt", "first sentence goes here. second sentence goes here");
    pipeline.ingest("docs", &doc).await.unwrap();
    pipeline.ingest("docs", &doc).await.unwrap();

    let results = pipeline.query("docs", "sentence").await.unwrap();
    assert_eq!(results.len(), 2);
}
