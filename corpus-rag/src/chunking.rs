//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`SentenceChunker`] — accumulates sentences up to a word budget
//! - [`FixedSizeChunker`] — splits by character count with configurable overlap

use crate::document::{Chunk, Document, METADATA_CHUNK_INDEX};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Build a [`Chunk`] from raw text, inheriting the document's metadata.
fn make_chunk(document: &Document, index: usize, text: String) -> Chunk {
    let mut metadata = document.metadata.clone();
    metadata.insert(METADATA_CHUNK_INDEX.to_string(), index.to_string());
    Chunk {
        id: format!("{}_{index}", document.id),
        text,
        embedding: Vec::new(),
        metadata,
        document_id: document.id.clone(),
    }
}

/// Accumulates whole sentences into chunks bounded by a word budget.
///
/// Text is split on `". "`. Sentences are appended greedily; once adding
/// the next sentence would push the chunk past `max_words`, the chunk is
/// emitted and a new one starts with that sentence. Document order is
/// preserved, and a single sentence longer than the budget is still
/// emitted as its own oversized chunk.
///
/// Within a chunk, sentences keep their `". "` separators, so joining the
/// produced chunks back with `". "` reproduces the input text.
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    max_words: usize,
}

impl SentenceChunker {
    /// Create a new `SentenceChunker` with the given word budget per chunk.
    pub fn new(max_words: usize) -> Self {
        Self { max_words }
    }
}

impl Chunker for SentenceChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let mut pieces: Vec<Vec<&str>> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_words = 0usize;

        for sentence in document.text.split(". ") {
            let words = sentence.split_whitespace().count();
            if !current.is_empty() && current_words + words > self.max_words {
                pieces.push(std::mem::take(&mut current));
                current_words = 0;
            }
            current.push(sentence);
            current_words += words;
        }
        if !current.is_empty() {
            pieces.push(current);
        }

        pieces
            .into_iter()
            .map(|sentences| sentences.join(". "))
            .filter(|text| !text.trim().is_empty())
            .enumerate()
            .map(|(i, text)| make_chunk(document, i, text))
            .collect()
    }
}

/// Splits text into fixed-size character windows with configurable overlap.
///
/// Windows are measured in characters, not bytes, so multi-byte text never
/// splits inside a code point.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — characters shared between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() || self.chunk_size == 0 {
            return Vec::new();
        }

        let chars: Vec<char> = document.text.chars().collect();
        let step = self.chunk_size.saturating_sub(self.chunk_overlap);

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chunk_index = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let text: String = chars[start..end].iter().collect();
            chunks.push(make_chunk(document, chunk_index, text));

            chunk_index += 1;
            if step == 0 {
                break;
            }
            start += step;
        }

        chunks
    }
}
