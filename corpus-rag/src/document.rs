//! Data types for documents, chunks, and search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key holding the source filename of a chunk's parent document.
pub const METADATA_FILENAME: &str = "filename";

/// Metadata key holding a chunk's position within its parent document.
pub const METADATA_CHUNK_INDEX: &str = "chunk_index";

/// A source document: extracted text plus identifying metadata.
///
/// Documents are ephemeral — they exist only while a request is being
/// handled. The `id` is the SHA-256 hash of the uploaded bytes, so identical
/// content always maps to the same identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Content-hash identifier for the document.
    pub id: String,
    /// The extracted text content.
    pub text: String,
    /// Key-value metadata (source filename, etc.).
    pub metadata: HashMap<String, String>,
    /// Optional URI pointing at the archived original (object-store key).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
}

/// A segment of a [`Document`] with its vector embedding.
///
/// Chunk IDs are `{document_id}_{chunk_index}`, so re-ingesting identical
/// content overwrites its own records instead of duplicating them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
    /// Metadata inherited from the parent document plus chunk-specific fields.
    pub metadata: HashMap<String, String>,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

impl Chunk {
    /// The source filename recorded for this chunk, falling back to the
    /// parent document ID when no filename was captured.
    pub fn source(&self) -> &str {
        self.metadata.get(METADATA_FILENAME).map(String::as_str).unwrap_or(&self.document_id)
    }
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
