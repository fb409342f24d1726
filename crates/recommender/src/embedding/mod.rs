//! Text embedding capability and nearest-neighbour lookup over the course corpus.

mod hash;
mod index;
mod sentence;

use crate::{
    config::{EmbedderKind, EngineConfig},
    error::EngineError,
};
use std::sync::Arc;

pub use crate::error::EmbedError;
pub use hash::HashEmbedder;
pub use index::{CorpusIndex, EmbeddingIndex, IndexEntry, Neighbor};
pub use sentence::{DEFAULT_MODEL, SentenceEmbedder};

/// Turns a course text into a fixed-length vector.
///
/// Implementations must be deterministic: the corpus is embedded once per
/// snapshot and queries are compared against those stored vectors.
pub trait Embedder: Send + Sync {
    /// Short backend name, for logs
    fn name(&self) -> &'static str;

    /// Length of every vector returned by [`Embedder::embed`]
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Embeds several texts; backends with batch inference should override this
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Builds the backend selected by `config.embedder`
pub fn build_embedder(config: &EngineConfig) -> Result<Arc<dyn Embedder>, EngineError> {
    match config.embedder {
        EmbedderKind::Sentence => {
            log::info!("Loading sentence embedding model {DEFAULT_MODEL:?}");
            let embedder = SentenceEmbedder::load(DEFAULT_MODEL, config.model_cache.clone())
                .map_err(|source| EngineError::ModelLoad {
                    backend: config.embedder.to_string(),
                    source,
                })?;
            log::info!("Sentence model ready, {} dimensions", embedder.dimension());
            Ok(Arc::new(embedder))
        }
        EmbedderKind::Hash => {
            log::warn!("Using the hash embedder; similarity only reflects shared words");
            Ok(Arc::new(HashEmbedder::new(config.hash_dimension)))
        }
    }
}

/// Cosine similarity in [-1, 1]; zero vectors and length mismatches give 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        log::warn!(
            "embedding dimension mismatch ({} vs {}); returning zero similarity",
            a.len(),
            b.len()
        );
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
