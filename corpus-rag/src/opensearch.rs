//! OpenSearch vector store backend.
//!
//! Provides [`OpenSearchVectorStore`] which implements [`VectorStore`]
//! against a managed OpenSearch cluster over its REST API: one JSON record
//! per chunk in a k-NN-enabled index, searched with the `knn` query.
//!
//! # Example
//!
//! ```rust,ignore
//! use corpus_rag::opensearch::OpenSearchVectorStore;
//!
//! let store = OpenSearchVectorStore::new("https://search-example.us-east-1.es.amazonaws.com")
//!     .with_basic_auth("admin", "secret");
//! store.create_collection("docs", 1536).await?;
//! store.upsert("docs", &chunks).await?;
//! let results = store.search("docs", &query_embedding, 4).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// A [`VectorStore`] backed by a managed OpenSearch cluster.
///
/// Collections map to OpenSearch indices with an `embedding` field of type
/// `knn_vector`. Records are written by chunk ID, so re-ingesting identical
/// content overwrites rather than duplicates.
pub struct OpenSearchVectorStore {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

/// The shape of a chunk record stored in an index.
#[derive(Serialize, Deserialize)]
struct StoredChunk {
    text: String,
    document_id: String,
    #[serde(default)]
    metadata: HashMap<String, String>,
    #[serde(default)]
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: f32,
    #[serde(rename = "_source")]
    source: StoredChunk,
}

impl OpenSearchVectorStore {
    /// Create a new store pointing at the given cluster URL
    /// (e.g. `https://search-example.us-east-1.es.amazonaws.com`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: reqwest::Client::new(), base_url, credentials: None }
    }

    /// Authenticate requests with HTTP basic auth.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    fn map_err(message: impl Into<String>) -> RagError {
        RagError::VectorStore { backend: "opensearch".to_string(), message: message.into() }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, format!("{}/{path}", self.base_url));
        if let Some((username, password)) = &self.credentials {
            builder = builder.basic_auth(username, Some(password));
        }
        builder
    }

    async fn send(&self, builder: reqwest::RequestBuilder, what: &str) -> Result<reqwest::Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_err(format!("{what} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_err(format!("{what} returned {status}: {body}")));
        }
        Ok(response)
    }

    async fn index_exists(&self, name: &str) -> Result<bool> {
        let response = self
            .request(reqwest::Method::HEAD, name)
            .send()
            .await
            .map_err(|e| Self::map_err(format!("index check failed: {e}")))?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl VectorStore for OpenSearchVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        if self.index_exists(name).await? {
            debug!(collection = name, "opensearch index already exists, skipping creation");
            return Ok(());
        }

        let body = json!({
            "settings": { "index": { "knn": true } },
            "mappings": {
                "properties": {
                    "embedding": { "type": "knn_vector", "dimension": dimensions },
                    "text": { "type": "text" },
                    "document_id": { "type": "keyword" },
                    "metadata": { "type": "object" }
                }
            }
        });

        self.send(self.request(reqwest::Method::PUT, name).json(&body), "index creation").await?;

        debug!(collection = name, dimensions, "created opensearch index");
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        if !self.index_exists(name).await? {
            debug!(collection = name, "opensearch index does not exist, nothing to delete");
            return Ok(());
        }

        self.send(self.request(reqwest::Method::DELETE, name), "index deletion").await?;

        debug!(collection = name, "deleted opensearch index");
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        // One write per chunk, keyed by chunk ID.
        for chunk in chunks {
            let record = StoredChunk {
                text: chunk.text.clone(),
                document_id: chunk.document_id.clone(),
                metadata: chunk.metadata.clone(),
                embedding: chunk.embedding.clone(),
            };

            self.send(
                self.request(reqwest::Method::PUT, &format!("{collection}/_doc/{}", chunk.id))
                    .json(&record),
                "document indexing",
            )
            .await?;
        }

        debug!(collection, count = chunks.len(), "indexed chunks into opensearch");
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        for id in ids {
            let response = self
                .request(reqwest::Method::DELETE, &format!("{collection}/_doc/{id}"))
                .send()
                .await
                .map_err(|e| Self::map_err(format!("document deletion failed: {e}")))?;

            let status = response.status();
            // 404 means the record is already gone.
            if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
                let body = response.text().await.unwrap_or_default();
                return Err(Self::map_err(format!("document deletion returned {status}: {body}")));
            }
        }

        debug!(collection, count = ids.len(), "deleted chunks from opensearch");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let body = json!({
            "size": top_k,
            "query": {
                "knn": {
                    "embedding": {
                        "vector": embedding,
                        "k": top_k
                    }
                }
            }
        });

        let response = self
            .send(
                self.request(reqwest::Method::POST, &format!("{collection}/_search")).json(&body),
                "knn search",
            )
            .await?;

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| Self::map_err(format!("failed to parse search response: {e}")))?;

        let results = search_response
            .hits
            .hits
            .into_iter()
            .map(|hit| SearchResult {
                chunk: Chunk {
                    id: hit.id,
                    text: hit.source.text,
                    embedding: hit.source.embedding,
                    metadata: hit.source.metadata,
                    document_id: hit.source.document_id,
                },
                score: hit.score,
            })
            .collect();

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_the_base_url() {
        let store = OpenSearchVectorStore::new("https://search.example.com/");
        assert_eq!(store.base_url, "https://search.example.com");
    }

    #[test]
    fn search_hits_deserialize_into_results() {
        let raw = json!({
            "took": 3,
            "hits": {
                "total": { "value": 1 },
                "hits": [{
                    "_id": "abc_0",
                    "_score": 0.87,
                    "_source": {
                        "text": "chunk text",
                        "document_id": "abc",
                        "metadata": { "filename": "notes.txt", "chunk_index": "0" },
                        "embedding": [0.1, 0.2]
                    }
                }]
            }
        });

        let parsed: SearchResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.hits.hits.len(), 1);
        let hit = &parsed.hits.hits[0];
        assert_eq!(hit.id, "abc_0");
        assert_eq!(hit.source.text, "chunk text");
        assert_eq!(hit.source.metadata.get("filename"), Some(&"notes.txt".to_string()));
    }

    #[test]
    fn stored_chunk_tolerates_missing_optional_fields() {
        let parsed: StoredChunk =
            serde_json::from_value(json!({ "text": "t", "document_id": "d" })).unwrap();
        assert!(parsed.metadata.is_empty());
        assert!(parsed.embedding.is_empty());
    }
}
