//! Plain text extractor.

use async_trait::async_trait;
use docrag_core::{ExtractError, ExtractedText, TextExtractor};
use std::path::Path;
use tokio::fs;

/// Extractor for plain text files.
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Create a new plain text extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &str {
        "text"
    }

    fn extensions(&self) -> &[&str] {
        &["txt"]
    }

    async fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractError> {
        let bytes = fs::read(path).await?;
        let text = String::from_utf8(bytes)
            .map_err(|e| ExtractError::Parse(format!("invalid UTF-8: {e}")))?;

        Ok(ExtractedText::plain(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrag_core::SourceFormat;
    use tempfile::tempdir;

    #[test]
    fn test_extensions() {
        let extractor = PlainTextExtractor::new();
        assert_eq!(extractor.extensions(), &["txt"]);
        assert_eq!(extractor.name(), "text");
    }

    #[test]
    fn test_can_extract_case_insensitive() {
        let extractor = PlainTextExtractor::new();
        assert!(extractor.can_extract(Path::new("/test/FILE.TXT")));
        assert!(extractor.can_extract(Path::new("/test/notes.txt")));
        assert!(!extractor.can_extract(Path::new("/test/notes.md")));
        assert!(!extractor.can_extract(Path::new("/test/file_without_extension")));
    }

    #[tokio::test]
    async fn test_extract_simple_text() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("test.txt");
        std::fs::write(&file_path, "Hello, world!").unwrap();

        let content = PlainTextExtractor::new().extract(&file_path).await.unwrap();

        assert_eq!(content.text, "Hello, world!");
        assert_eq!(content.format, SourceFormat::PlainText);
    }

    #[tokio::test]
    async fn test_extract_zero_byte_file_is_empty_text() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("empty.txt");
        std::fs::write(&file_path, "").unwrap();

        let content = PlainTextExtractor::new().extract(&file_path).await.unwrap();

        assert_eq!(content.text, "");
    }

    #[tokio::test]
    async fn test_extract_preserves_whitespace_verbatim() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("multi.txt");
        let text = "Line 1\n\n  Line 2\tend\n";
        std::fs::write(&file_path, text).unwrap();

        let content = PlainTextExtractor::new().extract(&file_path).await.unwrap();

        assert_eq!(content.text, text);
    }

    #[tokio::test]
    async fn test_extract_handles_unicode() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("unicode.txt");
        let text = "Hello 世界! Привет мир!";
        std::fs::write(&file_path, text).unwrap();

        let content = PlainTextExtractor::new().extract(&file_path).await.unwrap();

        assert_eq!(content.text, text);
    }

    #[tokio::test]
    async fn test_extract_invalid_utf8_fails() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("latin1.txt");
        std::fs::write(&file_path, [0x66, 0x6f, 0xff, 0xfe]).unwrap();

        let result = PlainTextExtractor::new().extract(&file_path).await;

        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[tokio::test]
    async fn test_extract_nonexistent_file_fails() {
        let result = PlainTextExtractor::new()
            .extract(Path::new("/nonexistent/file.txt"))
            .await;

        assert!(matches!(result, Err(ExtractError::Io(_))));
    }
}
