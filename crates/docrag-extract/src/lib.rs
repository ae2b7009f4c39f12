//! # docrag-extract
//!
//! Text extraction for the docrag chunking pipeline.
//!
//! Every extractor turns one file into an [`ExtractedText`](docrag_core::ExtractedText).
//! The [`ExtractorRegistry`] routes files by extension and converts every
//! failure into a "no text" result, so one bad file never aborts a folder scan.
//!
//! ## Supported Formats
//!
//! | Extractor | Extension | Behavior |
//! |-----------|-----------|----------|
//! | [`PlainTextExtractor`] | `.txt` | UTF-8 text, read verbatim |
//! | [`PdfExtractor`] | `.pdf` | Page texts concatenated in page order; a bad page contributes `""` |
//! | [`DocxExtractor`] | `.docx` | Paragraph texts joined with `\n` |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docrag_extract::ExtractorRegistry;
//! use std::path::Path;
//!
//! let registry = ExtractorRegistry::with_defaults();
//! match registry.extract_text(Path::new("report.pdf")).await {
//!     Some(text) => println!("Extracted {} bytes", text.len()),
//!     None => println!("no text"),
//! }
//! ```

pub mod docx;
pub mod pdf;
pub mod registry;
pub mod text;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use registry::ExtractorRegistry;
pub use text::PlainTextExtractor;
