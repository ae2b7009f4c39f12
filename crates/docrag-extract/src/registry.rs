//! Extractor registry routing files to extractors by extension.

use docrag_core::{ExtractError, ExtractedText, TextExtractor};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{DocxExtractor, PdfExtractor, PlainTextExtractor};

/// Characters of extracted text echoed into the log on success.
const PREVIEW_CHARS: usize = 50;

/// Registry of text extractors.
pub struct ExtractorRegistry {
    /// Named extractors
    extractors: HashMap<String, Arc<dyn TextExtractor>>,
    /// Lowercase extension to extractor name mapping
    extension_mapping: HashMap<String, String>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            extension_mapping: HashMap::new(),
        }
    }

    /// Registry with the plain text, PDF and DOCX extractors.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("text", PlainTextExtractor::new());
        registry.register("pdf", PdfExtractor::new());
        registry.register("docx", DocxExtractor::new());
        registry
    }

    /// Register an extractor. Later registrations win for shared extensions.
    pub fn register<E: TextExtractor + 'static>(&mut self, name: &str, extractor: E) {
        let extractor = Arc::new(extractor);
        for ext in extractor.extensions() {
            self.extension_mapping
                .insert(ext.to_ascii_lowercase(), name.to_string());
        }
        self.extractors.insert(name.to_string(), extractor);
    }

    /// Get the extractor responsible for a path.
    #[must_use]
    pub fn get_for_path(&self, path: &Path) -> Option<Arc<dyn TextExtractor>> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.extension_mapping
            .get(&ext)
            .and_then(|name| self.extractors.get(name))
            .cloned()
    }

    /// Whether some registered extractor handles this path.
    #[must_use]
    pub fn is_supported(&self, path: &Path) -> bool {
        self.get_for_path(path).is_some()
    }

    /// Sorted list of supported extensions.
    #[must_use]
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.extension_mapping.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }

    /// Extract text from a file, surfacing typed errors.
    pub async fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractError> {
        let extractor = self.get_for_path(path).ok_or_else(|| {
            ExtractError::UnsupportedType(
                path.extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )
        })?;

        extractor.extract(path).await
    }

    /// Extract text from a file, or `None` for "no text".
    ///
    /// Unsupported extensions and every I/O or parse failure are logged and
    /// become `None`; they never propagate. An empty but valid file yields
    /// `Some("")`.
    pub async fn extract_text(&self, path: &Path) -> Option<String> {
        info!("Processing file: {:?}", path);

        match self.extract(path).await {
            Ok(extracted) => {
                info!(
                    "Extracted text from {:?} ({:?}, length: {}): {}...",
                    path,
                    extracted.format,
                    extracted.text.len(),
                    preview(&extracted.text)
                );
                if extracted.failed_pages > 0 {
                    warn!(
                        "{} page(s) of {:?} yielded no text",
                        extracted.failed_pages, path
                    );
                }
                Some(extracted.text)
            }
            Err(ExtractError::UnsupportedType(ext)) => {
                warn!("Unsupported file type: {:?} ({:?})", ext, path);
                None
            }
            Err(e) => {
                warn!("Error processing {:?}: {}", path, e);
                None
            }
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
