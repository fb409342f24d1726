use super::{EmbedError, Embedder};
use siphasher::sip::SipHasher13;
use std::hash::{Hash, Hasher};

// Changing either key changes every vector in the corpus
const HASH_SEED_K0: u64 = 0x5eed_c0de_0000_0001;
const HASH_SEED_K1: u64 = 0x5eed_c0de_0000_0002;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic feature-hashing embedder.
///
/// Words and character trigrams of the lower-cased text are hashed into a
/// fixed number of signed buckets and the result is L2-normalised, so texts
/// sharing vocabulary (including inflected forms) land close together.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        let hash = hasher.finish();

        // Low bits pick the bucket, the top bit picks the sign
        let index = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }

    fn tokens(text: &str) -> Vec<(String, f32)> {
        let mut tokens = Vec::new();

        for word in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            tokens.push((format!("w:{word}"), WORD_WEIGHT));

            let padded: Vec<char> = format!("#{word}#").chars().collect();
            for window in padded.windows(3) {
                tokens.push((format!("t:{}", window.iter().collect::<String>()), TRIGRAM_WEIGHT));
            }
        }

        tokens
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl Embedder for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut vector = vec![0.0f32; self.dimension];

        for (token, weight) in Self::tokens(text) {
            let (index, sign) = self.bucket(&token);
            vector[index] += sign * weight;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }
}
