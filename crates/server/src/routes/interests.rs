use crate::{
    dtos::recommendation::{InterestListResponse, InterestResponse, RecommendationsResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// List the interests available for recommendation
#[utoipa::path(
    get,
    path = "/interests",
    responses(
        (status = 200, description = "First interests of the catalog", body = InterestListResponse)
    ),
    tag = "Interests"
)]
pub async fn list_interests(State(state): State<AppState>) -> Json<InterestListResponse> {
    let interests: Vec<InterestResponse> = state
        .engine
        .list_available_interests()
        .into_iter()
        .map(Into::into)
        .collect();

    Json(InterestListResponse {
        total: interests.len(),
        interests,
    })
}

/// Get the ranked recommendations for one interest
#[utoipa::path(
    get,
    path = "/interests/{id}/recommendations",
    params(
        ("id" = u64, Path, description = "Interest ID")
    ),
    responses(
        (status = 200, description = "Recommendations generated, possibly none", body = RecommendationsResponse),
        (status = 404, description = "Interest not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Interests"
)]
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<RecommendationsResponse>, StatusCode> {
    let engine = state.engine.clone();

    // Strategies run on the rayon pool, keep them off the async workers
    let (summary, outcome) = tokio::task::spawn_blocking(move || {
        (engine.interest_summary(id), engine.generate_recommendations(id))
    })
    .await
    .map_err(|err| {
        log::error!("Recommendation task for interest {id} failed: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    summary
        .and_then(|summary| RecommendationsResponse::from_outcome(summary, outcome))
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
