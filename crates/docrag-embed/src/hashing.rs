//! Feature-hashing embedder.
//!
//! Maps lowercase words and their character trigrams into a fixed number of
//! signed buckets. No model download, fully deterministic, and texts sharing
//! words or word stems land closer together. Useful offline and in tests.

use async_trait::async_trait;
use docrag_core::{EmbedError, Embedder, EmbeddingConfig, EmbeddingOutput};

/// Default embedding dimension, matching MiniLM-sized models.
pub const DEFAULT_DIMENSION: usize = 384;

/// Weight of a whole-word feature relative to one trigram feature.
const WORD_WEIGHT: f32 = 2.0;

/// Deterministic feature-hashing embedder.
///
/// # Example
///
/// ```rust
/// use docrag_embed::HashingEmbedder;
/// use docrag_core::{Embedder, EmbeddingConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let embedder = HashingEmbedder::new(64);
/// let config = EmbeddingConfig::default();
/// let a = embedder.embed_text(&["the cat sat"], &config).await?;
/// let b = embedder.embed_text(&["the cat sat"], &config).await?;
/// assert_eq!(a[0].embedding, b[0].embedding);
/// # Ok(())
/// # }
/// ```
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// Create a hashing embedder with the given dimension (at least 1).
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Embed one text.
    fn embed_one(&self, text: &str, normalize: bool) -> EmbeddingOutput {
        let mut embedding = vec![0.0f32; self.dimension];
        let mut token_count = 0;

        for word in text.split_whitespace() {
            let word: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if word.is_empty() {
                continue;
            }
            token_count += 1;

            self.add_feature(&mut embedding, word.as_bytes(), WORD_WEIGHT);

            let padded: Vec<char> = format!("<{word}>").chars().collect();
            for trigram in padded.windows(3) {
                let trigram: String = trigram.iter().collect();
                self.add_feature(&mut embedding, trigram.as_bytes(), 1.0);
            }
        }

        if normalize {
            let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                for value in &mut embedding {
                    *value /= norm;
                }
            }
        }

        EmbeddingOutput {
            embedding,
            token_count,
        }
    }

    /// Add a signed feature into its hash bucket.
    fn add_feature(&self, embedding: &mut [f32], feature: &[u8], weight: f32) {
        let hash = blake3::hash(feature);
        let bytes = hash.as_bytes();

        let mut bucket_bytes = [0u8; 8];
        bucket_bytes.copy_from_slice(&bytes[..8]);
        let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };

        embedding[bucket] += sign * weight;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn model_name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_text(
        &self,
        texts: &[&str],
        config: &EmbeddingConfig,
    ) -> Result<Vec<EmbeddingOutput>, EmbedError> {
        Ok(texts
            .iter()
            .map(|text| self.embed_one(text, config.normalize))
            .collect())
    }
}
