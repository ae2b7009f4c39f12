//! Error types for docrag.
//!
//! The public pipeline boundaries (`ExtractorRegistry::extract_text`,
//! `EmbeddingIndex::build`, `EmbeddingIndex::retrieve`) degrade these into
//! soft results; the typed errors exist for the layers underneath.

use thiserror::Error;

/// Error from building an embedding index.
#[derive(Error, Debug)]
pub enum Error {
    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),

    /// Vector index operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Per-file text extraction errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction failed: {0}")]
    Failed(String),
}

/// Chunking errors.
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid root folder: {0}")]
    InvalidRoot(String),
}

/// Embedding errors.
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("model loading failed: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("embedder returned {actual} vectors for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },
}

/// Vector index errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("dimension mismatch: index is {expected}-dimensional, vector has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid dimension: {0}")]
    InvalidDimension(usize),
}

/// Result type alias for docrag operations.
pub type Result<T> = std::result::Result<T, Error>;
