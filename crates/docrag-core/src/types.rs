//! Core types for docrag.
//!
//! ## Documents
//! - [`Document`]: A file path plus its extracted raw text
//! - [`ExtractedText`]: Text produced by one extractor, with format metadata
//! - [`SourceFormat`]: Which structured format the text came from
//!
//! ## Embeddings
//! - [`EmbeddingConfig`]: Configuration for embedding generation
//! - [`EmbeddingOutput`]: Result of embedding a text
//!
//! ## Search
//! - [`Neighbor`]: A stored vector position with its squared L2 distance
//! - [`RetrievedChunk`]: A chunk returned by retrieval
//! - [`IndexState`]: Lifecycle of an embedding index
//! - [`IndexStats`]: Snapshot statistics for a built index

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Documents
// ============================================================================

/// A file path plus its extracted raw text.
///
/// Transient: documents only live long enough to contribute their text to
/// the chunker's text pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path of the source file
    pub path: PathBuf,
    /// Extracted text (possibly empty)
    pub text: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Structured format a piece of text was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Plain text, read verbatim
    PlainText,
    /// Page-oriented document (PDF)
    Pdf,
    /// Paragraph-oriented document (DOCX)
    Docx,
}

/// Text extracted from a single file.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// Full text in document order
    pub text: String,
    /// Format the text came from
    pub format: SourceFormat,
    /// Number of pages visited (page-oriented formats)
    pub page_count: Option<u32>,
    /// Pages that failed extraction and contributed no text
    pub failed_pages: u32,
    /// Number of paragraphs joined (paragraph-oriented formats)
    pub paragraph_count: Option<u32>,
}

impl ExtractedText {
    /// Plain text with no structural metadata.
    pub fn plain(text: String) -> Self {
        Self {
            text,
            format: SourceFormat::PlainText,
            page_count: None,
            failed_pages: 0,
            paragraph_count: None,
        }
    }
}

// ============================================================================
// Embedding
// ============================================================================

/// Configuration for embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Normalize embeddings to unit length
    pub normalize: bool,
    /// Batch size for processing
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            batch_size: 32,
        }
    }
}

/// Output from embedding.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    /// The embedding vector
    pub embedding: Vec<f32>,
    /// Number of tokens in input
    pub token_count: usize,
}

// ============================================================================
// Search
// ============================================================================

/// One search hit from a vector index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Insertion position of the stored vector
    pub position: usize,
    /// Squared Euclidean distance to the query
    pub distance: f32,
}

/// A chunk returned by retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Position of the chunk in the sequence the index was built from
    pub position: usize,
    /// Chunk text
    pub text: String,
    /// Squared Euclidean distance from the query embedding
    pub distance: f32,
}

/// Lifecycle of an embedding index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexState {
    /// No successful build yet, or the last build was rejected
    #[default]
    NotBuilt,
    /// Holds a complete snapshot of chunks and vectors
    Built,
}

/// Statistics for a built index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of chunks
    pub chunk_count: usize,
    /// Embedding dimension
    pub dimension: usize,
    /// Model that produced the vectors
    pub model: String,
    /// When the snapshot was built
    pub built_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new("/docs/a.txt", "hello");
        assert_eq!(doc.path, PathBuf::from("/docs/a.txt"));
        assert_eq!(doc.text, "hello");
    }

    #[test]
    fn test_extracted_text_plain() {
        let extracted = ExtractedText::plain("abc".to_string());
        assert_eq!(extracted.format, SourceFormat::PlainText);
        assert!(extracted.page_count.is_none());
        assert_eq!(extracted.failed_pages, 0);
    }

    #[test]
    fn test_source_format_serialization() {
        assert_eq!(
            serde_json::to_string(&SourceFormat::PlainText).unwrap(),
            "\"plain_text\""
        );
        assert_eq!(serde_json::to_string(&SourceFormat::Pdf).unwrap(), "\"pdf\"");
        assert_eq!(
            serde_json::to_string(&SourceFormat::Docx).unwrap(),
            "\"docx\""
        );
    }

    #[test]
    fn test_embedding_config_default() {
        let config = EmbeddingConfig::default();
        assert!(config.normalize);
        assert_eq!(config.batch_size, 32);
    }

    #[test]
    fn test_index_state_default_is_not_built() {
        assert_eq!(IndexState::default(), IndexState::NotBuilt);
        assert_eq!(
            serde_json::to_string(&IndexState::NotBuilt).unwrap(),
            "\"not_built\""
        );
    }

    #[test]
    fn test_retrieved_chunk_serialization() {
        let chunk = RetrievedChunk {
            position: 2,
            text: "cats and dogs play".to_string(),
            distance: 0.25,
        };
        let json = serde_json::to_string(&chunk).unwrap();
        let back: RetrievedChunk = serde_json::from_str(&json).unwrap();
        assert_eq!(chunk, back);
    }

    #[test]
    fn test_index_stats_serialization() {
        let stats = IndexStats {
            chunk_count: 10,
            dimension: 384,
            model: "hashing".to_string(),
            built_at: Utc::now(),
        };
        let json = serde_json::to_string(&stats).unwrap();
        let back: IndexStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.chunk_count, 10);
        assert_eq!(back.dimension, 384);
    }
}
