//! # docrag-core
//!
//! Core types and traits for docrag, a folder-to-answers retrieval core.
//!
//! This crate provides the foundational abstractions used throughout docrag:
//!
//! - **Text Extraction**: [`TextExtractor`] trait for pulling plain text out of a file
//! - **Embedding Generation**: [`Embedder`] trait for converting text to dense vectors
//! - **Vector Search**: [`VectorIndex`] trait for exact nearest-neighbor search
//!
//! ## Architecture
//!
//! ```text
//! folder → TextExtractor (per file) → text pool → word windows (chunks)
//!                                                        ↓
//!                                   Embedder → VectorIndex (build once)
//!                                                        ↓
//!                                  query → Embedder → k nearest chunks
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Document`] | A file path plus its extracted raw text |
//! | [`ExtractedText`] | Text produced by a single extractor |
//! | [`EmbeddingOutput`] | One embedding vector plus token count |
//! | [`Neighbor`] | A search hit: stored position and squared distance |
//! | [`IndexState`] | The `NotBuilt`/`Built` lifecycle of an embedding index |
//!
//! ## Related Crates
//!
//! - `docrag-extract`: plain text, PDF and DOCX extractors
//! - `docrag-chunker`: word-window chunking over a folder
//! - `docrag-embed`: hashing and Candle embedders
//! - `docrag-store`: exact L2 flat index
//! - `docrag-index`: the embedding index lifecycle

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ChunkError, EmbedError, Error, ExtractError, Result, StoreError};
pub use traits::*;
pub use types::*;
