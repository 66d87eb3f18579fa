//! Retrieval-augmented question answering for corpus.
//!
//! This crate provides:
//! - Document, chunk, and search-result types
//! - Sentence and fixed-size chunking strategies
//! - The [`EmbeddingProvider`] trait with an OpenAI backend
//! - The [`VectorStore`] trait with in-memory and OpenSearch backends
//! - The [`RagPipeline`] (ingest and query) and [`AnswerEngine`]
//!   (retrieve-then-generate)

pub mod answer;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod openai;
pub mod opensearch;
pub mod pipeline;
pub mod vectorstore;

pub use answer::{Answer, AnswerEngine};
pub use chunking::{Chunker, FixedSizeChunker, SentenceChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, METADATA_CHUNK_INDEX, METADATA_FILENAME, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use openai::OpenAiEmbeddingProvider;
pub use opensearch::OpenSearchVectorStore;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use vectorstore::VectorStore;
