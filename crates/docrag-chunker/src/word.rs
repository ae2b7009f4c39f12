//! Fixed-size word-window chunking.

use docrag_core::ChunkError;

/// Default window size in words.
pub const DEFAULT_CHUNK_SIZE: usize = 200;

/// Splits text into windows of exactly `chunk_size` whitespace-separated
/// words; the last window may be shorter.
///
/// Flattening the chunks back into words reproduces the input word
/// sequence exactly.
#[derive(Debug, Clone, Copy)]
pub struct WordChunker {
    chunk_size: usize,
}

impl WordChunker {
    /// Create a chunker; `chunk_size` must be at least 1.
    pub fn new(chunk_size: usize) -> Result<Self, ChunkError> {
        if chunk_size == 0 {
            return Err(ChunkError::InvalidConfig(
                "chunk_size must be a positive word count".to_string(),
            ));
        }
        Ok(Self { chunk_size })
    }

    /// Window size in words.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Split `text` into chunks of single-space-joined words.
    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();

        words
            .chunks(self.chunk_size)
            .map(|window| window.join(" "))
            .filter(|chunk| !chunk.trim().is_empty())
            .collect()
    }
}

impl Default for WordChunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{i}")).collect()
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(matches!(
            WordChunker::new(0),
            Err(ChunkError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_chunk_size() {
        assert_eq!(WordChunker::default().chunk_size(), 200);
    }

    #[test]
    fn test_empty_and_whitespace_text() {
        let chunker = WordChunker::new(3).unwrap();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("  \n\t  ").is_empty());
    }

    #[test]
    fn test_windows_rejoined_with_single_spaces() {
        let chunker = WordChunker::new(2).unwrap();
        let chunks = chunker.chunk("the  cat\nsat\t on the\n\nmat");
        assert_eq!(chunks, vec!["the cat", "sat on", "the mat"]);
    }

    #[test]
    fn test_short_last_window() {
        let chunker = WordChunker::new(3).unwrap();
        let chunks = chunker.chunk("a b c d e");
        assert_eq!(chunks, vec!["a b c", "d e"]);
    }

    #[test]
    fn test_chunk_count_and_sizes() {
        for n in 1..=7 {
            let chunker = WordChunker::new(n).unwrap();
            for len in 0..=25 {
                let text = words(len).join(" ");
                let chunks = chunker.chunk(&text);

                assert_eq!(chunks.len(), len.div_ceil(n), "n={n} len={len}");
                for (i, chunk) in chunks.iter().enumerate() {
                    let count = chunk.split_whitespace().count();
                    if i + 1 < chunks.len() {
                        assert_eq!(count, n);
                    } else {
                        assert!(count >= 1 && count <= n);
                    }
                }
            }
        }
    }

    #[test]
    fn test_flattening_reproduces_words() {
        let text = "Lorem ipsum dolor sit amet,\nconsectetur   adipiscing elit. \
                    Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";
        let expected: Vec<&str> = text.split_whitespace().collect();

        for n in 1..=expected.len() + 1 {
            let chunks = WordChunker::new(n).unwrap().chunk(text);
            let flattened: Vec<&str> = chunks.iter().flat_map(|c| c.split(' ')).collect();
            assert_eq!(flattened, expected, "n={n}");
        }
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let text = words(57).join("\n");
        let chunker = WordChunker::new(10).unwrap();
        assert_eq!(chunker.chunk(&text), chunker.chunk(&text));
    }
}
