//! # docrag-embed
//!
//! Embedding model providers for docrag.
//!
//! Both providers are deterministic: the same text always maps to the same
//! vector for a given loaded model, which the embedding index relies on.
//!
//! ## Cargo Features
//!
//! - `candle`: Enables [`CandleEmbedder`], a local BERT sentence-embedding model
//! - Without `candle`: Only [`HashingEmbedder`] is available
//!
//! ## Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`HashingEmbedder`] | Model-free feature hashing of words and character trigrams (always available) |
//! | [`CandleEmbedder`] | Mean-pooled BERT embeddings, default `sentence-transformers/all-MiniLM-L6-v2` (requires `candle`) |
//!
//! ## Usage
//!
//! ```rust
//! use docrag_embed::HashingEmbedder;
//! use docrag_core::{Embedder, EmbeddingConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let embedder = HashingEmbedder::new(384);
//! let outputs = embedder
//!     .embed_text(&["Hello world"], &EmbeddingConfig::default())
//!     .await?;
//! assert_eq!(outputs[0].embedding.len(), 384);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "candle")]
pub mod candle;
pub mod hashing;

#[cfg(feature = "candle")]
pub use candle::CandleEmbedder;
pub use hashing::HashingEmbedder;
