use crate::{
    dtos::recommendation::{ReloadResponse, StatsResponse},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};

/// Get counts and demand figures for the loaded catalog
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Catalog statistics", body = StatsResponse)
    ),
    tag = "Catalog"
)]
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.engine.stats().into())
}

/// Re-read the source tables and swap in a new snapshot
#[utoipa::path(
    post,
    path = "/catalog/reload",
    responses(
        (status = 200, description = "Catalog reloaded", body = ReloadResponse),
        (status = 500, description = "Sources could not be loaded; the previous catalog stays active")
    ),
    tag = "Catalog"
)]
pub async fn reload_catalog(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, StatusCode> {
    let engine = state.engine.clone();
    let sources = state.sources.clone();

    tokio::task::spawn_blocking(move || -> Result<ReloadResponse, String> {
        let reference = loader::load_reference(&sources).map_err(|e| e.to_string())?;
        let response = ReloadResponse {
            courses: reference.courses().count(),
            offerings: reference.offerings().len(),
            interests: reference.interests().len(),
        };
        engine.reload(reference).map_err(|e| e.to_string())?;
        Ok(response)
    })
    .await
    .map_err(|err| err.to_string())
    .and_then(|result| result)
    .map(Json)
    .map_err(|err| {
        log::error!("Catalog reload failed: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
