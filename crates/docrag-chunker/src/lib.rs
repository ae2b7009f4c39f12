//! Document chunking for docrag.
//!
//! - [`WordChunker`]: splits a text pool into consecutive windows of `chunk_size` words
//! - [`FolderChunker`]: walks a folder, extracts every supported file, pools the
//!   text and hands it to a [`WordChunker`]

pub mod folder;
pub mod word;

pub use folder::FolderChunker;
pub use word::{WordChunker, DEFAULT_CHUNK_SIZE};
