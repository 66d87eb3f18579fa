//! Retrieval pipeline orchestrator.
//!
//! The [`RagPipeline`] coordinates the ingest-and-query workflow by
//! composing an [`EmbeddingProvider`], a [`VectorStore`], and a [`Chunker`].
//!
//! # Example
//!
//! ```rust,ignore
//! use corpus_rag::{InMemoryVectorStore, RagConfig, RagPipeline, SentenceChunker};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .chunker(Arc::new(SentenceChunker::new(500)))
//!     .build()?;
//!
//! pipeline.create_collection("docs").await?;
//! pipeline.ingest("docs", &document).await?;
//! let results = pipeline.query("docs", "what is in the docs?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{Chunk, Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// The retrieval pipeline orchestrator.
///
/// Coordinates document ingestion (chunk → embed → store) and query
/// execution (embed → search → filter). Construct one via
/// [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Create a named collection in the vector store.
    ///
    /// The collection is created with the dimensionality reported by the
    /// configured [`EmbeddingProvider`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] if the vector store operation fails.
    pub async fn create_collection(&self, name: &str) -> Result<()> {
        let dimensions = self.embedding_provider.dimensions();
        self.vector_store.create_collection(name, dimensions).await.map_err(|e| {
            error!(collection = name, error = %e, "failed to create collection");
            RagError::Pipeline(format!("failed to create collection '{name}': {e}"))
        })
    }

    /// Delete a named collection from the vector store.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] if the vector store operation fails.
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        self.vector_store.delete_collection(name).await.map_err(|e| {
            error!(collection = name, error = %e, "failed to delete collection");
            RagError::Pipeline(format!("failed to delete collection '{name}': {e}"))
        })
    }

    /// Ingest a single document: chunk → embed → store.
    ///
    /// Returns the chunks that were stored (with embeddings attached).
    /// A failure while embedding or storing aborts the whole ingest —
    /// a partial-failure run never reports success.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] if embedding or storage fails,
    /// including the document ID in the error message.
    pub async fn ingest(&self, collection: &str, document: &Document) -> Result<Vec<Chunk>> {
        // 1. Chunk the document
        let mut chunks = self.chunker.chunk(document);
        if chunks.is_empty() {
            info!(document.id = %document.id, chunk_count = 0, "ingested document (empty)");
            return Ok(chunks);
        }

        // 2. Embed every chunk text
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "embedding failed during ingestion");
            RagError::Pipeline(format!("embedding failed for document '{}': {e}", document.id))
        })?;

        // 3. Attach embeddings to chunks
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        // 4. Write into the vector store
        self.vector_store.upsert(collection, &chunks).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "upsert failed during ingestion");
            RagError::Pipeline(format!("upsert failed for document '{}': {e}", document.id))
        })?;

        let chunk_count = chunks.len();
        info!(document.id = %document.id, chunk_count, "ingested document");

        Ok(chunks)
    }

    /// Ingest multiple documents through the chunk → embed → store workflow.
    ///
    /// Returns all chunks that were stored across all documents.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] on the first document that fails.
    pub async fn ingest_batch(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> Result<Vec<Chunk>> {
        let mut all_chunks = Vec::new();
        for document in documents {
            let chunks = self.ingest(collection, document).await?;
            all_chunks.extend(chunks);
        }
        Ok(all_chunks)
    }

    /// Query the pipeline: embed → search → filter by threshold.
    ///
    /// Returns up to `top_k` results ordered by descending relevance score.
    /// Results below the configured `similarity_threshold` are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] if embedding or search fails.
    pub async fn query(&self, collection: &str, query: &str) -> Result<Vec<SearchResult>> {
        // 1. Embed the question
        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RagError::Pipeline(format!("query embedding failed: {e}"))
        })?;

        // 2. k-NN search
        let results = self
            .vector_store
            .search(collection, &query_embedding, self.config.top_k)
            .await
            .map_err(|e| {
                error!(collection, error = %e, "vector store search failed");
                RagError::Pipeline(format!("search failed in collection '{collection}': {e}"))
            })?;

        // 3. Filter by similarity threshold
        let threshold = self.config.similarity_threshold;
        let filtered: Vec<SearchResult> =
            results.into_iter().filter(|r| r.score >= threshold).collect();

        info!(result_count = filtered.len(), "query completed");

        Ok(filtered)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields are required; call [`build()`](RagPipelineBuilder::build)
/// to validate and produce the pipeline.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::Config("vector_store is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;

        Ok(RagPipeline { config, embedding_provider, vector_store, chunker })
    }
}
