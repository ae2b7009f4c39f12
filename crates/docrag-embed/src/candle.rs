//! Sentence-transformer embedder using Candle.
//!
//! Loads a BERT-architecture model from the `HuggingFace` Hub, by default
//! `sentence-transformers/all-MiniLM-L6-v2` (384 dimensions), and produces
//! mean-pooled token embeddings. The model is loaded once, eagerly, so load
//! failures surface when the embedder is constructed rather than mid-build.

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use docrag_core::{EmbedError, Embedder, EmbeddingConfig, EmbeddingOutput};
use hf_hub::{api::tokio::ApiBuilder, Repo, RepoType};
use std::path::PathBuf;
use std::sync::Arc;
use tokenizers::Tokenizer;
use tracing::{debug, info};

/// Default model identifier on `HuggingFace` Hub.
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Maximum sequence length.
const MAX_TOKENS: usize = 512;

/// Loaded model state shared with blocking inference tasks.
struct LoadedModel {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

/// BERT sentence embedder using Candle.
pub struct CandleEmbedder {
    model_id: String,
    dimension: usize,
    inner: Arc<LoadedModel>,
}

impl CandleEmbedder {
    /// Download (if needed) and load a model.
    ///
    /// `cache_dir` overrides the default Hub cache location.
    pub async fn load(model_id: &str, cache_dir: Option<PathBuf>) -> Result<Self, EmbedError> {
        let device = Device::cuda_if_available(0).unwrap_or(Device::Cpu);
        info!("Loading embedding model {} on {:?}", model_id, device);

        let mut builder = ApiBuilder::new();
        if let Some(dir) = cache_dir {
            builder = builder.with_cache_dir(dir);
        }
        let api = builder
            .build()
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to create HF API: {e}")))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        debug!("Fetching tokenizer...");
        let tokenizer_path = repo
            .get("tokenizer.json")
            .await
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to download tokenizer: {e}")))?;

        debug!("Fetching config...");
        let config_path = repo
            .get("config.json")
            .await
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to download config: {e}")))?;

        debug!("Fetching model weights...");
        let weights_path = repo
            .get("model.safetensors")
            .await
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to download weights: {e}")))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to load tokenizer: {e}")))?;

        let config_str = tokio::fs::read_to_string(&config_path)
            .await
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to read config: {e}")))?;
        let config: Config = serde_json::from_str(&config_str)
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to parse config: {e}")))?;
        let dimension = config.hidden_size;

        // SAFETY: weights come from the Hub cache and are only read.
        #[allow(unsafe_code)]
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| EmbedError::ModelLoad(format!("Failed to load weights: {e}")))?
        };

        let model = BertModel::load(vb, &config)
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to create BERT model: {e}")))?;

        info!("Embedding model loaded ({} dimensions)", dimension);

        Ok(Self {
            model_id: model_id.to_string(),
            dimension,
            inner: Arc::new(LoadedModel {
                model,
                tokenizer,
                device,
            }),
        })
    }

    /// Load the default model into the default cache.
    pub async fn load_default() -> Result<Self, EmbedError> {
        Self::load(DEFAULT_MODEL_ID, None).await
    }
}

impl LoadedModel {
    /// Encode a batch of texts.
    fn encode_batch(
        &self,
        texts: Vec<String>,
        normalize: bool,
    ) -> Result<Vec<EmbeddingOutput>, EmbedError> {
        let batch_size = texts.len();
        let encodings = self
            .tokenizer
            .encode_batch(texts, true)
            .map_err(|e| EmbedError::Inference(format!("Tokenization failed: {e}")))?;

        let sequences: Vec<(&[u32], &[u32])> = encodings
            .iter()
            .map(|e| (e.get_ids(), e.get_attention_mask()))
            .collect();
        let PackedBatch {
            input_ids: input_ids_vec,
            attention_mask: attention_mask_vec,
            token_counts,
            max_len,
        } = pack_batch(&sequences, MAX_TOKENS);
        let token_type_ids_vec = vec![0u32; batch_size * max_len];

        let input_ids = Tensor::from_vec(input_ids_vec, (batch_size, max_len), &self.device)
            .map_err(|e| EmbedError::Inference(format!("Failed to create input_ids tensor: {e}")))?;
        let attention_mask =
            Tensor::from_vec(attention_mask_vec, (batch_size, max_len), &self.device).map_err(
                |e| EmbedError::Inference(format!("Failed to create attention_mask tensor: {e}")),
            )?;
        let token_type_ids =
            Tensor::from_vec(token_type_ids_vec, (batch_size, max_len), &self.device).map_err(
                |e| EmbedError::Inference(format!("Failed to create token_type_ids tensor: {e}")),
            )?;

        let output = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| EmbedError::Inference(format!("Model forward failed: {e}")))?;

        let pooled = mean_pooling(&output, &attention_mask)?;
        let embeddings = if normalize {
            l2_normalize(&pooled)?
        } else {
            pooled
        };

        let mut results = Vec::with_capacity(batch_size);
        for (i, token_count) in token_counts.into_iter().enumerate() {
            let embedding = embeddings
                .get(i)
                .map_err(|e| EmbedError::Inference(format!("Failed to get embedding {i}: {e}")))?
                .to_vec1::<f32>()
                .map_err(|e| EmbedError::Inference(format!("Failed to convert to vec: {e}")))?;
            results.push(EmbeddingOutput {
                embedding,
                token_count,
            });
        }

        Ok(results)
    }
}

/// Row-major model inputs for one batch.
struct PackedBatch {
    input_ids: Vec<u32>,
    attention_mask: Vec<u32>,
    token_counts: Vec<usize>,
    max_len: usize,
}

/// Pad or truncate each `(ids, mask)` sequence to the batch's longest length.
///
/// The tokenizer's own attention mask is kept, so padding it inserted stays
/// masked and a text's embedding does not depend on its batch neighbours.
fn pack_batch(sequences: &[(&[u32], &[u32])], max_tokens: usize) -> PackedBatch {
    let max_len = sequences
        .iter()
        .map(|(ids, _)| ids.len())
        .max()
        .unwrap_or(0)
        .min(max_tokens);

    let mut input_ids = Vec::with_capacity(sequences.len() * max_len);
    let mut attention_mask = Vec::with_capacity(sequences.len() * max_len);
    let mut token_counts = Vec::with_capacity(sequences.len());

    for (ids, mask) in sequences {
        let len = ids.len().min(max_len);
        let mut real_tokens = 0;

        for i in 0..max_len {
            if i < len {
                let attend = mask.get(i).copied().unwrap_or(1);
                real_tokens += usize::from(attend != 0);
                input_ids.push(ids[i]);
                attention_mask.push(attend);
            } else {
                input_ids.push(0);
                attention_mask.push(0);
            }
        }
        token_counts.push(real_tokens);
    }

    PackedBatch {
        input_ids,
        attention_mask,
        token_counts,
        max_len,
    }
}

/// Mean pooling with attention mask.
fn mean_pooling(token_embeddings: &Tensor, attention_mask: &Tensor) -> Result<Tensor, EmbedError> {
    let mask = attention_mask
        .unsqueeze(2)
        .map_err(|e| EmbedError::Inference(format!("unsqueeze failed: {e}")))?
        .broadcast_as(token_embeddings.shape())
        .map_err(|e| EmbedError::Inference(format!("broadcast failed: {e}")))?
        .to_dtype(DType::F32)
        .map_err(|e| EmbedError::Inference(format!("dtype conversion failed: {e}")))?;

    let sum = token_embeddings
        .mul(&mask)
        .map_err(|e| EmbedError::Inference(format!("mul failed: {e}")))?
        .sum(1)
        .map_err(|e| EmbedError::Inference(format!("sum failed: {e}")))?;

    let count = mask
        .sum(1)
        .map_err(|e| EmbedError::Inference(format!("mask sum failed: {e}")))?
        .clamp(1e-9, f64::MAX)
        .map_err(|e| EmbedError::Inference(format!("clamp failed: {e}")))?;

    sum.div(&count)
        .map_err(|e| EmbedError::Inference(format!("div failed: {e}")))
}

/// L2 normalize each row.
fn l2_normalize(embeddings: &Tensor) -> Result<Tensor, EmbedError> {
    let norm = embeddings
        .sqr()
        .map_err(|e| EmbedError::Inference(format!("sqr failed: {e}")))?
        .sum_keepdim(1)
        .map_err(|e| EmbedError::Inference(format!("sum_keepdim failed: {e}")))?
        .sqrt()
        .map_err(|e| EmbedError::Inference(format!("sqrt failed: {e}")))?
        .clamp(1e-12, f64::MAX)
        .map_err(|e| EmbedError::Inference(format!("clamp failed: {e}")))?;

    embeddings
        .broadcast_div(&norm)
        .map_err(|e| EmbedError::Inference(format!("div failed: {e}")))
}

#[async_trait]
impl Embedder for CandleEmbedder {
    fn model_name(&self) -> &str {
        &self.model_id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_text(
        &self,
        texts: &[&str],
        config: &EmbeddingConfig,
    ) -> Result<Vec<EmbeddingOutput>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let batch_size = config.batch_size.max(1);
        debug!("Embedding {} texts with batch_size {}", texts.len(), batch_size);

        let mut all_results = Vec::with_capacity(texts.len());
        for batch in texts.chunks(batch_size) {
            let inner = Arc::clone(&self.inner);
            let owned: Vec<String> = batch.iter().map(|t| (*t).to_string()).collect();
            let normalize = config.normalize;

            let results = tokio::task::spawn_blocking(move || inner.encode_batch(owned, normalize))
                .await
                .map_err(|e| EmbedError::Inference(format!("Embedding task failed: {e}")))??;
            all_results.extend(results);
        }

        Ok(all_results)
    }
}
