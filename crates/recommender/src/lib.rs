//! Recommendation matching engine.
//!
//! Given a student's interest in a course at a unit, five independent
//! strategies look for offerings that could satisfy it, and the assembler
//! merges them into one ranked list.

pub mod assembler;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod geo;
pub mod reference;
pub mod stats;
pub mod strategies;

pub use assembler::{RecommendationOutcome, StrategyRun, assemble};
pub use config::{EmbedderKind, EngineConfig};
pub use embedding::{Embedder, HashEmbedder, SentenceEmbedder, build_embedder};
pub use engine::{RecommendationEngine, Snapshot};
pub use error::{EmbedError, EngineError, StrategyError};
pub use reference::ReferenceData;
pub use stats::{CatalogStats, CourseDemand, summarize};
