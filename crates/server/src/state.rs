use loader::SourceConfig;
use recommender::RecommendationEngine;
use std::sync::Arc;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    /// Where `POST /catalog/reload` reads the tables from
    pub sources: Arc<SourceConfig>,
}
