use models::catalog::CourseId;
use thiserror::Error;

/// Failures of the embedding capability
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("embedding backend unavailable: {0}")]
    Unavailable(String),

    #[error("embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Errors that prevent an engine snapshot from being built
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to embed the course corpus: {0}")]
    Embedding(#[from] EmbedError),

    #[error("failed to load the {backend} embedder: {source}")]
    ModelLoad {
        backend: String,
        #[source]
        source: EmbedError,
    },

    #[error("embedding dimension must be positive")]
    ZeroDimension,
}

/// A failure inside a single strategy; the other strategies still run
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("could not embed course {course_id}: {source}")]
    Embedding {
        course_id: CourseId,
        #[source]
        source: EmbedError,
    },

    #[error("strategy panicked: {0}")]
    Panicked(String),
}
