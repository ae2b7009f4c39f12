//! Prompt context assembled from retrieved chunks.

use std::fmt;

const CONTEXT_HEADER: &str = "\n\nRelevant Document Context:\n";
const PROMPT_PREFIX: &str = "Generate a reply to this message: ";

/// Retrieved chunks rendered as a block to append to a generation prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalContext {
    rendered: String,
}

impl RetrievalContext {
    /// Render chunks in retrieval order. No chunks renders as an empty string.
    pub fn from_chunks<S: AsRef<str>>(chunks: &[S]) -> Self {
        if chunks.is_empty() {
            return Self::default();
        }

        let body: Vec<&str> = chunks.iter().map(AsRef::as_ref).collect();
        Self {
            rendered: format!("{CONTEXT_HEADER}{}", body.join("\n")),
        }
    }

    /// Whether there is no context to add.
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }

    /// The rendered context block.
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// Full prompt asking for a reply to `message` with this context appended.
    pub fn prompt_for(&self, message: &str) -> String {
        format!("{PROMPT_PREFIX}{message}{}", self.rendered)
    }
}

impl fmt::Display for RetrievalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}
