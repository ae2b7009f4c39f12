//! Core traits for docrag components.
//!
//! - [`TextExtractor`]: Extract plain text from a file
//! - [`Embedder`]: Generate vector embeddings
//! - [`VectorIndex`]: Store vectors and answer exact k-nearest-neighbor queries
//!
//! The embedding index takes its embedder as an injected trait object, so
//! tests can swap in a stub without touching a global model.

use async_trait::async_trait;
use std::path::Path;

use crate::error::{EmbedError, ExtractError, StoreError};
use crate::types::{EmbeddingConfig, EmbeddingOutput, ExtractedText, Neighbor};

// ============================================================================
// Text Extraction
// ============================================================================

/// Trait for extracting text from files.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Lowercase file extensions (without the dot) this extractor handles.
    fn extensions(&self) -> &[&str];

    /// Check if this extractor handles the file, by case-insensitive extension.
    fn can_extract(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|supported| ext.eq_ignore_ascii_case(supported))
            })
    }

    /// Extract text from a file.
    async fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractError>;
}

// ============================================================================
// Embedding
// ============================================================================

/// Trait for generating embeddings.
///
/// Implementations must be deterministic: the same text yields the same
/// vector for a given loaded model.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name/identifier.
    fn model_name(&self) -> &str;

    /// Embedding dimension.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts, one output per input in the same order.
    async fn embed_text(
        &self,
        texts: &[&str],
        config: &EmbeddingConfig,
    ) -> Result<Vec<EmbeddingOutput>, EmbedError>;

    /// Embed a query.
    async fn embed_query(
        &self,
        query: &str,
        config: &EmbeddingConfig,
    ) -> Result<EmbeddingOutput, EmbedError> {
        let results = self.embed_text(&[query], config).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::Inference("empty embedding result".to_string()))
    }
}

// ============================================================================
// Vector Search
// ============================================================================

/// Trait for a fixed-dimension vector collection with exact k-NN search.
pub trait VectorIndex: Send + Sync {
    /// Dimension every stored vector has.
    fn dimension(&self) -> usize;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    /// Whether the index holds no vectors.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append vectors; positions continue from the current length.
    fn add(&mut self, vectors: &[Vec<f32>]) -> Result<(), StoreError>;

    /// Return up to `k` nearest stored vectors, closest first.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, StoreError>;
}
