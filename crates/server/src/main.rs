use axum::{Json, Router, routing::get};
use loader::SourceConfig;
use recommender::{EngineConfig, RecommendationEngine};
use state::AppState;
use std::{env, error::Error, sync::Arc};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

mod doc;
mod dtos;
mod routes;
mod state;
mod utils;

use doc::ApiDoc;
use routes::{catalog, health, interests};
use utils::shutdown::shutdown_signal;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Builds the router, serving the generated OpenAPI document next to the API
fn app(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(health::health))
        .routes(routes!(interests::list_interests))
        .routes(routes!(interests::get_recommendations))
        .routes(routes!(catalog::get_stats))
        .routes(routes!(catalog::reload_catalog))
        .with_state(state)
        .split_for_parts();

    router
        .route(
            "/api-docs/openapi.json",
            get(move || {
                let api = api.clone();
                async move { Json(api) }
            }),
        )
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
}

async fn run() -> Result<(), Box<dyn Error>> {
    let sources = SourceConfig::from_env()?;
    let config = EngineConfig::from_env();

    let reference = tokio::task::spawn_blocking({
        let sources = sources.clone();
        move || loader::load_reference(&sources)
    })
    .await??;

    // Loading the sentence model may download it
    let engine =
        tokio::task::spawn_blocking(move || RecommendationEngine::from_config(reference, config))
            .await??;

    let state = AppState {
        engine: Arc::new(engine),
        sources: Arc::new(sources),
    };

    let addr = env::var("SERVER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Running axum on http://{addr}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(err) = run().await {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use chrono::NaiveDate;
    use models::{
        catalog::{Course, CourseStatus, Unit},
        offering::{Interest, Offering},
        schedule::Schedule,
    };
    use recommender::{HashEmbedder, ReferenceData};
    use serde_json::Value;
    use tower::ServiceExt;

    fn state() -> AppState {
        let date = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let course = |id, area: &str, title: &str| Course {
            id,
            title: title.to_string(),
            knowledge_area: area.to_string(),
            modality: "PRESENCIAL".to_string(),
            status: CourseStatus::Active,
        };
        let unit = |id, name: &str| Unit {
            id,
            name: name.to_string(),
            coordinates: None,
        };

        let reference = ReferenceData::new(
            vec![
                course(101, "Tecnologia", "Programador Web"),
                course(102, "Saude", "Cuidador de Idosos"),
            ],
            vec![unit(1, "Centro"), unit(2, "Bairro")],
            vec![],
            vec![Offering {
                id: 10,
                course_id: 101,
                unit_id: 1,
                created_at: date(15),
                starts_at: None,
                schedule: Schedule::default(),
            }],
            [(1, 101, 1), (2, 102, 2)]
                .into_iter()
                .map(|(id, course_id, unit_id)| Interest {
                    id,
                    student_id: 900 + id,
                    course_id,
                    unit_id,
                    interest_date: date(10),
                    schedule: Schedule::default(),
                })
                .collect(),
        );

        let engine = RecommendationEngine::new(
            reference,
            Arc::new(HashEmbedder::default()),
            EngineConfig::default(),
        )
        .unwrap();

        AppState {
            engine: Arc::new(engine),
            sources: Arc::new(SourceConfig {
                offerings_path: "missing/offerings.csv".into(),
                interests_path: "missing/interests.csv".into(),
                structure_dir: "missing".into(),
                offerings_year: None,
            }),
        }
    }

    async fn call(method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app(state())
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_recommendations_for_known_interest() {
        let (status, body) = call("GET", "/interests/1/recommendations").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ranked");
        assert_eq!(body["recommendations"][0]["offering_id"], 10);
        assert_eq!(body["recommendations"][0]["strategy"], "MATCH_COMPLETE");
        assert_eq!(body["distribution"]["MATCH_COMPLETE"], 1);
    }

    #[tokio::test]
    async fn test_interest_without_matches() {
        let (status, body) = call("GET", "/interests/2/recommendations").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "no_recommendations");
        assert_eq!(body["count"], 0);
        assert_eq!(body["interest"]["student_id"], 902);
    }

    #[tokio::test]
    async fn test_unknown_interest_is_404() {
        let (status, _) = call("GET", "/interests/99/recommendations").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_and_stats() {
        let (_, interests) = call("GET", "/interests").await;
        assert_eq!(interests["total"], 2);

        let (_, stats) = call("GET", "/stats").await;
        assert_eq!(stats["courses"], 2);
        assert_eq!(stats["interests_by_modality"]["PRESENCIAL"], 2);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_the_catalog() {
        let state = state();
        let response = app(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/catalog/reload")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(state.engine.snapshot().reference.interests().len(), 2);
    }

    #[tokio::test]
    async fn test_openapi_document_lists_the_routes() {
        let (status, body) = call("GET", "/api-docs/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/interests/{id}/recommendations"].is_object());
        assert!(body["paths"]["/catalog/reload"]["post"].is_object());
    }
}
