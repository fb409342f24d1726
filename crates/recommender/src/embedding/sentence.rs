use super::{EmbedError, Embedder};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use parking_lot::Mutex;
use std::path::PathBuf;

/// Multilingual paraphrase model; catalog titles are in Portuguese
pub const DEFAULT_MODEL: EmbeddingModel = EmbeddingModel::ParaphraseMLMpnetBaseV2;

/// Pre-trained sentence embedding model run locally through ONNX.
///
/// Inference needs exclusive access to the session, so calls are serialised.
/// The corpus is embedded in one batch per snapshot, which keeps that cheap.
pub struct SentenceEmbedder {
    model: Mutex<TextEmbedding>,
    dimension: usize,
}

impl SentenceEmbedder {
    /// Loads the model, downloading it into `cache_dir` on first use
    pub fn load(model: EmbeddingModel, cache_dir: Option<PathBuf>) -> Result<Self, EmbedError> {
        let mut options = InitOptions::new(model).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let mut model =
            TextEmbedding::try_new(options).map_err(|e| EmbedError::Unavailable(e.to_string()))?;

        let dimension = run(&mut model, vec!["curso".to_string()])?
            .first()
            .map(Vec::len)
            .unwrap_or_default();
        if dimension == 0 {
            return Err(EmbedError::Unavailable(
                "model returned an empty embedding".to_string(),
            ));
        }

        Ok(Self {
            model: Mutex::new(model),
            dimension,
        })
    }
}

fn run(model: &mut TextEmbedding, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbedError> {
    let expected = texts.len();
    let mut vectors = model
        .embed(texts, None)
        .map_err(|e| EmbedError::Unavailable(e.to_string()))?;

    if vectors.len() != expected {
        return Err(EmbedError::Unavailable(format!(
            "model returned {} embeddings for {expected} texts",
            vectors.len()
        )));
    }

    for vector in &mut vectors {
        normalize(vector);
    }
    Ok(vectors)
}

fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

impl Embedder for SentenceEmbedder {
    fn name(&self) -> &'static str {
        "sentence"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut vectors = self.embed_batch(&[text.to_string()])?;
        vectors
            .pop()
            .ok_or_else(|| EmbedError::Unavailable("model returned no embedding".to_string()))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = run(&mut self.model.lock(), texts.to_vec())?;
        if let Some(vector) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(EmbedError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::cosine_similarity;

    #[test]
    fn normalize_scales_to_unit_length() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v);
        assert_eq!(v, vec![0.6, 0.8]);

        let mut zero = vec![0.0, 0.0];
        normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }

    #[test]
    #[ignore = "downloads the embedding model"]
    fn paraphrases_clear_the_similarity_floor() {
        let embedder = SentenceEmbedder::load(DEFAULT_MODEL, None).unwrap();
        let score = |a: &str, b: &str| {
            cosine_similarity(&embedder.embed(a).unwrap(), &embedder.embed(b).unwrap())
        };

        let paraphrase = score(
            "Tecnologia - Programador Web",
            "Tecnologia - Desenvolvedor de Sites",
        );
        let unrelated = score("Tecnologia - Programador Web", "Alimentos - Confeiteiro");

        assert!(paraphrase > 0.7, "paraphrase scored {paraphrase}");
        assert!(paraphrase > unrelated);
        assert_eq!(embedder.embed("Gestão").unwrap().len(), embedder.dimension());
    }
}
