//! Embedding index for docrag.
//!
//! Turns an ordered chunk sequence into a searchable snapshot and answers
//! top-k queries against it.
//!
//! # Components
//!
//! - [`EmbeddingIndex`]: Owns the embedder and the current snapshot; exposes `build` and `retrieve`
//! - [`IndexConfig`]: Embedding options and the default `top_k`
//! - [`RetrievalContext`]: Renders retrieved chunks for a generation prompt
//!
//! # Example
//!
//! ```rust,ignore
//! use docrag_index::{EmbeddingIndex, IndexConfig};
//! use std::sync::Arc;
//!
//! let index = EmbeddingIndex::new(Arc::new(embedder), IndexConfig::default());
//!
//! if index.build(&chunks).await {
//!     for text in index.retrieve("feline pet", 3).await {
//!         println!("{text}");
//!     }
//! }
//! ```

pub mod context;
pub mod index;

pub use context::RetrievalContext;
pub use index::{EmbeddingIndex, IndexConfig, DEFAULT_TOP_K};
