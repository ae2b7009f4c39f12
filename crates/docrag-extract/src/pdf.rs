//! PDF text extractor.
//!
//! Uses lopdf to walk pages in order. A page whose text cannot be extracted
//! contributes an empty string; only a document that cannot be loaded at all
//! fails the file.

use async_trait::async_trait;
use docrag_core::{ExtractError, ExtractedText, SourceFormat, TextExtractor};
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// Extractor for PDF files.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    fn name(&self) -> &str {
        "pdf"
    }

    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    async fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractError> {
        debug!("Extracting PDF: {:?}", path);

        let bytes = tokio::fs::read(path).await?;

        // lopdf parsing is CPU-bound
        tokio::task::spawn_blocking(move || extract_pdf_pages(&bytes))
            .await
            .map_err(|e| ExtractError::Failed(format!("Task join error: {e}")))?
    }
}

/// Concatenate the text of every page in ascending page order.
fn extract_pdf_pages(bytes: &[u8]) -> Result<ExtractedText, ExtractError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| ExtractError::Parse(format!("PDF load failed: {e}")))?;

    let pages = doc
        .get_pages()
        .into_keys()
        .map(|page_num| (page_num, doc.extract_text(&[page_num])));
    let (text, page_count, failed_pages) = join_pages(pages);

    debug!(
        "Extracted {} pages ({} failed, {} chars)",
        page_count,
        failed_pages,
        text.len()
    );

    Ok(ExtractedText {
        text,
        format: SourceFormat::Pdf,
        page_count: Some(page_count),
        failed_pages,
        paragraph_count: None,
    })
}

/// Append page texts in order; a failed page contributes nothing.
///
/// Returns the text, the page count and the number of failed pages.
fn join_pages<E: std::fmt::Display>(
    pages: impl IntoIterator<Item = (u32, Result<String, E>)>,
) -> (String, u32, u32) {
    let mut text = String::new();
    let mut page_count = 0u32;
    let mut failed_pages = 0u32;

    for (page_num, page_text) in pages {
        page_count += 1;
        match page_text {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                debug!("Failed to extract text from page {}: {}", page_num, e);
                failed_pages += 1;
            }
        }
    }

    (text, page_count, failed_pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use tempfile::tempdir;

    /// Content stream drawing one line of Courier text.
    fn text_stream(text: &str) -> Stream {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        Stream::new(dictionary! {}, content.encode().unwrap())
    }

    /// Build a minimal PDF with one line of Courier text per page.
    fn build_pdf(page_texts: &[&str]) -> Vec<u8> {
        build_pdf_from_streams(page_texts.iter().map(|t| text_stream(t)).collect())
    }

    /// Build a PDF with one page per content stream.
    fn build_pdf_from_streams(streams: Vec<Stream>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids = Vec::new();
        for stream in streams {
            let content_id = doc.add_object(stream);
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::from(page_id));
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_extensions() {
        let extractor = PdfExtractor::new();
        assert!(extractor.can_extract(Path::new("/docs/report.pdf")));
        assert!(extractor.can_extract(Path::new("/docs/REPORT.PDF")));
        assert!(!extractor.can_extract(Path::new("/docs/report.docx")));
    }

    #[test]
    fn test_pages_concatenated_in_order() {
        let bytes = build_pdf(&["Alpha", "Omega"]);

        let extracted = extract_pdf_pages(&bytes).unwrap();

        assert_eq!(extracted.format, SourceFormat::Pdf);
        assert_eq!(extracted.page_count, Some(2));
        let alpha = extracted.text.find("Alpha").expect("first page text");
        let omega = extracted.text.find("Omega").expect("second page text");
        assert!(alpha < omega);
    }

    #[test]
    fn test_broken_page_does_not_fail_document() {
        let broken = Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x13, 0x37],
        );
        let bytes = build_pdf_from_streams(vec![text_stream("Good"), broken]);

        let extracted = extract_pdf_pages(&bytes).unwrap();

        assert_eq!(extracted.page_count, Some(2));
        assert!(extracted.text.contains("Good"));
    }

    #[test]
    fn test_failed_page_contributes_empty_text() {
        let pages: Vec<(u32, Result<String, String>)> = vec![
            (1, Ok("First ".to_string())),
            (2, Err("invalid content stream".to_string())),
            (3, Ok("Third".to_string())),
        ];

        let (text, page_count, failed_pages) = join_pages(pages);

        assert_eq!(text, "First Third");
        assert_eq!(page_count, 3);
        assert_eq!(failed_pages, 1);
    }

    #[test]
    fn test_corrupted_pdf_is_parse_error() {
        let result = extract_pdf_pages(b"%PDF-1.4\nthis is not really a pdf");
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[tokio::test]
    async fn test_extract_from_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("doc.pdf");
        std::fs::write(&file_path, build_pdf(&["Quarterly"])).unwrap();

        let extracted = PdfExtractor::new().extract(&file_path).await.unwrap();

        assert!(extracted.text.contains("Quarterly"));
        assert_eq!(extracted.failed_pages, 0);
    }

    #[tokio::test]
    async fn test_extract_garbage_file_fails() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("broken.pdf");
        std::fs::write(&file_path, [0u8; 64]).unwrap();

        let result = PdfExtractor::new().extract(&file_path).await;

        assert!(result.is_err());
    }
}
