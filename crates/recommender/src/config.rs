use std::{env, path::PathBuf, str::FromStr};
use strum::{Display, EnumString};

/// Embedding backend built by [`crate::RecommendationEngine::from_config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmbedderKind {
    /// Pre-trained multilingual sentence model
    #[default]
    Sentence,
    /// Offline feature hashing, only sensitive to shared words
    Hash,
}

/// Tunables of the matching engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Neighbours taken from an embedding search
    pub top_n: usize,
    /// Rows whose similarity is at or below this value are dropped
    pub similarity_floor: f32,
    /// Maximum number of interests returned by `list_available_interests`
    pub list_limit: usize,
    pub embedder: EmbedderKind,
    /// Where the sentence model is downloaded to; fastembed's default when unset
    pub model_cache: Option<PathBuf>,
    /// Vector length of the hash backend. The sentence model reports its own.
    pub hash_dimension: usize,
    /// Run the five strategies of one interest on the rayon pool
    pub parallel_strategies: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            similarity_floor: 0.7,
            list_limit: 20,
            embedder: EmbedderKind::Sentence,
            model_cache: None,
            hash_dimension: 384,
            parallel_strategies: true,
        }
    }
}

impl EngineConfig {
    /// Reads `RECOMMENDER_*` variables, falling back to the defaults for
    /// anything missing or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            top_n: var_or("RECOMMENDER_TOP_N", defaults.top_n),
            similarity_floor: var_or("RECOMMENDER_SIMILARITY_FLOOR", defaults.similarity_floor),
            list_limit: var_or("RECOMMENDER_LIST_LIMIT", defaults.list_limit),
            embedder: var_or("RECOMMENDER_EMBEDDER", defaults.embedder),
            model_cache: env::var_os("RECOMMENDER_MODEL_CACHE").map(PathBuf::from),
            hash_dimension: var_or("RECOMMENDER_HASH_DIM", defaults.hash_dimension),
            parallel_strategies: var_or(
                "RECOMMENDER_PARALLEL_STRATEGIES",
                defaults.parallel_strategies,
            ),
        }
    }
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring unparsable {key}={raw:?}");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.similarity_floor, 0.7);
        assert_eq!(config.list_limit, 20);
        assert_eq!(config.embedder, EmbedderKind::Sentence);
    }

    #[test]
    fn embedder_kind_parses_case_insensitively() {
        assert_eq!("hash".parse::<EmbedderKind>(), Ok(EmbedderKind::Hash));
        assert_eq!("Sentence".parse::<EmbedderKind>(), Ok(EmbedderKind::Sentence));
        assert!("bert".parse::<EmbedderKind>().is_err());
        assert_eq!(EmbedderKind::Hash.to_string(), "hash");
    }

    #[test]
    fn missing_values_fall_back() {
        assert_eq!(var_or("RECOMMENDER_TEST_UNSET_VARIABLE", 7usize), 7);
    }
}
