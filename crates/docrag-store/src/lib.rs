//! # docrag-store
//!
//! Vector index implementations for docrag.
//!
//! [`FlatL2Index`] keeps every vector in one contiguous buffer and answers
//! queries with an exhaustive squared-Euclidean scan. Results are exact, which
//! is what a few thousand chunks from a single folder need.
//!
//! ## Usage
//!
//! ```rust
//! use docrag_core::VectorIndex;
//! use docrag_store::FlatL2Index;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut index = FlatL2Index::new(2)?;
//! index.add(&[vec![0.0, 0.0], vec![3.0, 4.0]])?;
//!
//! let hits = index.search(&[3.0, 3.0], 1)?;
//! assert_eq!(hits[0].position, 1);
//! assert_eq!(hits[0].distance, 1.0);
//! # Ok(())
//! # }
//! ```

pub mod flat;

pub use flat::{squared_l2, FlatL2Index};
