//! DOCX text extractor.
//!
//! A `.docx` file is a zip container; the body lives in `word/document.xml`.
//! Each body-level `w:p` element is one paragraph whose text is the
//! concatenation of its `w:t` runs. Paragraphs are joined with `\n` in
//! document order.

use async_trait::async_trait;
use docrag_core::{ExtractError, ExtractedText, SourceFormat, TextExtractor};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Zip entry holding the main document body.
const DOCUMENT_PART: &str = "word/document.xml";

/// Extractor for DOCX files.
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a new DOCX extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for DocxExtractor {
    fn name(&self) -> &str {
        "docx"
    }

    fn extensions(&self) -> &[&str] {
        &["docx"]
    }

    async fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractError> {
        debug!("Extracting DOCX: {:?}", path);

        let bytes = tokio::fs::read(path).await?;

        let paragraphs = tokio::task::spawn_blocking(move || {
            let xml = read_document_part(&bytes)?;
            paragraphs_from_xml(&xml)
        })
        .await
        .map_err(|e| ExtractError::Failed(format!("Task join error: {e}")))??;

        Ok(ExtractedText {
            text: paragraphs.join("\n"),
            format: SourceFormat::Docx,
            page_count: None,
            failed_pages: 0,
            paragraph_count: Some(paragraphs.len() as u32),
        })
    }
}

/// Pull `word/document.xml` out of the zip container.
fn read_document_part(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Parse(format!("not a zip container: {e}")))?;

    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Parse(format!("missing {DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Collect body paragraph texts from WordprocessingML.
///
/// Only `w:p` elements directly under `w:body` count. Table cells, text boxes
/// and markup-compatibility fallbacks are skipped, so each paragraph is read
/// once and only its own runs contribute.
pub(crate) fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    // Stack depth at which a skipped subtree was entered.
    let mut skip_from: Option<usize> = None;
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name().as_ref().to_vec();
                if skip_from.is_none() {
                    match name.as_slice() {
                        b"w:txbxContent" | b"mc:Fallback" => skip_from = Some(stack.len()),
                        b"w:p" if is_body(&stack) => {
                            in_paragraph = true;
                            current.clear();
                        }
                        b"w:t" => in_text = true,
                        _ => {}
                    }
                }
                stack.push(name);
            }
            Ok(Event::Empty(e)) if skip_from.is_none() => match e.name().as_ref() {
                b"w:p" if is_body(&stack) => paragraphs.push(String::new()),
                b"w:tab" if in_paragraph && is_run(&stack) => current.push('\t'),
                b"w:br" | b"w:cr" if in_paragraph && is_run(&stack) => current.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => {
                stack.pop();
                if skip_from == Some(stack.len()) {
                    skip_from = None;
                } else if skip_from.is_none() {
                    match e.name().as_ref() {
                        b"w:p" if in_paragraph && is_body(&stack) => {
                            in_paragraph = false;
                            paragraphs.push(std::mem::take(&mut current));
                        }
                        b"w:t" => in_text = false,
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(t)) if in_text && in_paragraph && skip_from.is_none() => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::Parse(format!("bad text run: {e}")))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::Parse(format!(
                    "malformed document.xml at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Whether the innermost open element is the document body.
fn is_body(stack: &[Vec<u8>]) -> bool {
    stack.last().is_some_and(|name| name.as_slice() == b"w:body")
}

/// Whether the innermost open element is a run.
fn is_run(stack: &[Vec<u8>]) -> bool {
    stack.last().is_some_and(|name| name.as_slice() == b"w:r")
}
