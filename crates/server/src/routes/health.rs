use crate::{dtos::recommendation::HealthResponse, state::AppState};
use axum::{Json, extract::State};

/// Reports that the service is up, with the embedder in use and the size of the loaded catalog
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        embedder: state.engine.embedder().name().to_string(),
        interests: state.engine.snapshot().reference.interests().len(),
    })
}
