//! Configuration for the retrieval pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for the retrieval pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum words per chunk for sentence-based chunking.
    pub max_words: usize,
    /// Number of top results to return from vector search.
    pub top_k: usize,
    /// Minimum similarity score for results (results below this are dropped).
    pub similarity_threshold: f32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { max_words: 500, top_k: 4, similarity_threshold: 0.0 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum words per chunk.
    pub fn max_words(mut self, max_words: usize) -> Self {
        self.config.max_words = max_words;
        self
    }

    /// Set the number of top results to return from vector search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum similarity threshold for filtering results.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `max_words == 0` or `top_k == 0`.
    pub fn build(self) -> Result<RagConfig> {
        if self.config.max_words == 0 {
            return Err(RagError::Config("max_words must be greater than zero".to_string()));
        }
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_service_defaults() {
        let config = RagConfig::default();
        assert_eq!(config.max_words, 500);
        assert_eq!(config.top_k, 4);
        assert_eq!(config.similarity_threshold, 0.0);
    }

    #[test]
    fn builder_rejects_zero_top_k() {
        assert!(RagConfig::builder().top_k(0).build().is_err());
    }

    #[test]
    fn builder_rejects_zero_max_words() {
        assert!(RagConfig::builder().max_words(0).build().is_err());
    }
}
