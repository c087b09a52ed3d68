//! Sentence embeddings for résumé retrieval.
//!
//! Production uses `sentence-transformers/all-MiniLM-L6-v2` through fastembed
//! (ONNX runtime, CPU, normalized output). The model is loaded once at startup
//! and shared behind `Arc<dyn Embedder>`.

use std::path::PathBuf;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use thiserror::Error;
use tracing::info;

pub mod store;

pub use store::VectorStore;

/// A dense embedding vector.
pub type Embedding = Vec<f32>;

pub const MODEL_NAME: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const MODEL_DIMENSION: usize = 384;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to load embedding model '{model}': {reason}")]
    ModelLoad { model: String, reason: String },

    #[error("embedding inference failed: {0}")]
    Inference(String),

    #[error("embedding model returned {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },
}

/// Deterministic text embedder: the same text always yields the same vector.
pub trait Embedder: Send + Sync {
    fn model_name(&self) -> &str;

    fn dimension(&self) -> usize;

    /// Embeds documents for indexing, one vector per input, in input order.
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError>;

    /// Embeds a single retrieval query.
    fn embed_query(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut vectors = self.embed_documents(&[text.to_string()])?;
        match vectors.len() {
            1 => Ok(vectors.remove(0)),
            got => Err(EmbeddingError::CountMismatch { expected: 1, got }),
        }
    }
}

/// fastembed-backed MiniLM embedder.
pub struct FastEmbedder {
    model: TextEmbedding,
}

impl FastEmbedder {
    /// Loads (downloading on first use) the MiniLM model.
    ///
    /// Call once at startup: a failure here means the service cannot serve any
    /// analysis and should not start.
    pub fn load(cache_dir: Option<PathBuf>) -> Result<Self, EmbeddingError> {
        let mut options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let model = TextEmbedding::try_new(options).map_err(|e| EmbeddingError::ModelLoad {
            model: MODEL_NAME.to_string(),
            reason: e.to_string(),
        })?;

        info!("Embedding model loaded: {MODEL_NAME} ({MODEL_DIMENSION} dims)");
        Ok(Self { model })
    }
}

impl Embedder for FastEmbedder {
    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn dimension(&self) -> usize {
        MODEL_DIMENSION
    }

    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self
            .model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::Inference(e.to_string()))?;

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                got: vectors.len(),
            });
        }
        Ok(vectors)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Model-free embedder for tests.

    use super::*;

    /// Hashed bag-of-words embedder: texts sharing words land close together.
    pub(crate) struct HashingEmbedder {
        pub(crate) dimension: usize,
    }

    impl Default for HashingEmbedder {
        fn default() -> Self {
            Self { dimension: 64 }
        }
    }

    impl Embedder for HashingEmbedder {
        fn model_name(&self) -> &str {
            "test/hashing-bow"
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
            Ok(texts.iter().map(|t| self.embed_text(t)).collect())
        }
    }

    impl HashingEmbedder {
        fn embed_text(&self, text: &str) -> Embedding {
            let mut vector = vec![0.0_f32; self.dimension];
            for word in text
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| !w.is_empty())
            {
                // FNV-1a, stable across runs and platforms
                let hash = word.to_lowercase().bytes().fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
                    (h ^ b as u64).wrapping_mul(0x0100_0000_01b3)
                });
                vector[(hash % self.dimension as u64) as usize] += 1.0;
            }
            let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                vector.iter_mut().for_each(|v| *v /= norm);
            }
            vector
        }
    }

    /// Embedder that always fails, for error-path tests.
    pub(crate) struct BrokenEmbedder;

    impl Embedder for BrokenEmbedder {
        fn model_name(&self) -> &str {
            "test/broken"
        }

        fn dimension(&self) -> usize {
            0
        }

        fn embed_documents(&self, _texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
            Err(EmbeddingError::Inference("model assets missing".to_string()))
        }
    }
}
