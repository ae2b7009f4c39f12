//! The embedding index and its build/retrieve lifecycle.

use chrono::{DateTime, Utc};
use docrag_core::{
    EmbedError, Embedder, EmbeddingConfig, IndexState, IndexStats, RetrievedChunk, VectorIndex,
};
use docrag_store::FlatL2Index;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

/// Number of chunks returned by [`EmbeddingIndex::retrieve_default`] unless configured.
pub const DEFAULT_TOP_K: usize = 3;

/// Configuration for an [`EmbeddingIndex`].
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Options passed to the embedder for both chunks and queries
    pub embedding: EmbeddingConfig,
    /// Default number of chunks to retrieve
    pub top_k: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Immutable result of one successful build.
struct Snapshot {
    chunks: Vec<String>,
    vectors: FlatL2Index,
    model: String,
    built_at: DateTime<Utc>,
}

/// Embedding index over an ordered chunk sequence.
///
/// Starts [`IndexState::NotBuilt`]. A successful [`build`](Self::build) swaps in a
/// complete snapshot; concurrent retrieves see either the previous snapshot or
/// the new one, never a mix. Failures are reported as values: `build` returns
/// `false` and `retrieve` returns an empty sequence.
pub struct EmbeddingIndex {
    embedder: Arc<dyn Embedder>,
    config: IndexConfig,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    /// Serializes builds so the last build to start is the last to publish.
    build_lock: Mutex<()>,
}

impl EmbeddingIndex {
    /// Create an empty index using the given embedder.
    pub fn new(embedder: Arc<dyn Embedder>, config: IndexConfig) -> Self {
        Self {
            embedder,
            config,
            snapshot: RwLock::new(None),
            build_lock: Mutex::new(()),
        }
    }

    /// Index configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Embed `chunks` and replace the current snapshot.
    ///
    /// Returns `false` and leaves the index not built when `chunks` is empty
    /// or embedding fails.
    pub async fn build(&self, chunks: &[String]) -> bool {
        let _guard = self.build_lock.lock().await;

        if chunks.is_empty() {
            warn!("No chunks to index");
            self.clear().await;
            return false;
        }

        info!(
            "Building index over {} chunks with {}",
            chunks.len(),
            self.embedder.model_name()
        );

        let vectors = match self.embed_chunks(chunks).await {
            Ok(vectors) => vectors,
            Err(e) => {
                error!("Index build failed: {}", e);
                self.clear().await;
                return false;
            }
        };

        let snapshot = Snapshot {
            chunks: chunks.to_vec(),
            vectors,
            model: self.embedder.model_name().to_string(),
            built_at: Utc::now(),
        };
        let dimension = snapshot.vectors.dimension();

        *self.snapshot.write().await = Some(Arc::new(snapshot));
        info!("Index built: {} chunks, dimension {}", chunks.len(), dimension);
        true
    }

    async fn embed_chunks(&self, chunks: &[String]) -> docrag_core::Result<FlatL2Index> {
        let texts: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let outputs = self
            .embedder
            .embed_text(&texts, &self.config.embedding)
            .await?;

        if outputs.len() != chunks.len() {
            return Err(EmbedError::CountMismatch {
                expected: chunks.len(),
                actual: outputs.len(),
            }
            .into());
        }

        let vectors: Vec<Vec<f32>> = outputs.into_iter().map(|o| o.embedding).collect();
        Ok(FlatL2Index::from_vectors(&vectors)?)
    }

    async fn clear(&self) {
        *self.snapshot.write().await = None;
    }

    async fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().await.clone()
    }

    /// Texts of the `k` chunks nearest to `query`, nearest first.
    pub async fn retrieve(&self, query: &str, k: usize) -> Vec<String> {
        self.retrieve_scored(query, k)
            .await
            .into_iter()
            .map(|hit| hit.text)
            .collect()
    }

    /// [`retrieve`](Self::retrieve) with the configured `top_k`.
    pub async fn retrieve_default(&self, query: &str) -> Vec<String> {
        self.retrieve(query, self.config.top_k).await
    }

    /// The `k` nearest chunks with their positions and squared distances.
    ///
    /// Equal distances are ordered by ascending chunk position. Returns fewer
    /// than `k` hits when the index holds fewer chunks.
    pub async fn retrieve_scored(&self, query: &str, k: usize) -> Vec<RetrievedChunk> {
        if k == 0 {
            return Vec::new();
        }

        let Some(snapshot) = self.current().await else {
            warn!("Index not built, nothing to retrieve");
            return Vec::new();
        };
        if snapshot.chunks.is_empty() {
            warn!("Index is empty, nothing to retrieve");
            return Vec::new();
        }

        let query_vector = match self
            .embedder
            .embed_query(query, &self.config.embedding)
            .await
        {
            Ok(output) => output.embedding,
            Err(e) => {
                error!("Failed to embed query: {}", e);
                return Vec::new();
            }
        };

        let neighbors = match snapshot.vectors.search(&query_vector, k) {
            Ok(neighbors) => neighbors,
            Err(e) => {
                error!("Search failed: {}", e);
                return Vec::new();
            }
        };

        debug!("Retrieved {} of {} chunks", neighbors.len(), snapshot.chunks.len());

        neighbors
            .into_iter()
            .filter_map(|n| {
                snapshot.chunks.get(n.position).map(|text| RetrievedChunk {
                    position: n.position,
                    text: text.clone(),
                    distance: n.distance,
                })
            })
            .collect()
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> IndexState {
        if self.current().await.is_some() {
            IndexState::Built
        } else {
            IndexState::NotBuilt
        }
    }

    /// Number of indexed chunks (0 when not built).
    pub async fn len(&self) -> usize {
        self.current().await.map_or(0, |s| s.chunks.len())
    }

    /// Whether no chunks are indexed.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Dimension of the stored vectors, once built.
    pub async fn dimension(&self) -> Option<usize> {
        self.current().await.map(|s| s.vectors.dimension())
    }

    /// Statistics for the current snapshot.
    pub async fn stats(&self) -> Option<IndexStats> {
        self.current().await.map(|s| IndexStats {
            chunk_count: s.chunks.len(),
            dimension: s.vectors.dimension(),
            model: s.model.clone(),
            built_at: s.built_at,
        })
    }
}
