use chrono::NaiveDate;
use models::recommendation::{InterestSummary, Recommendation};
use recommender::{CatalogStats, RecommendationOutcome};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub embedder: String,
    pub interests: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InterestResponse {
    pub interest_id: u64,
    pub student_id: u64,
    pub course_id: u64,
    pub course_title: Option<String>,
    pub knowledge_area: Option<String>,
    pub modality: Option<String>,
    pub unit_id: u64,
    pub unit_name: Option<String>,
}

impl From<InterestSummary> for InterestResponse {
    fn from(summary: InterestSummary) -> Self {
        Self {
            interest_id: summary.interest_id,
            student_id: summary.student_id,
            course_id: summary.course_id,
            course_title: summary.course_title,
            knowledge_area: summary.knowledge_area,
            modality: summary.modality,
            unit_id: summary.unit_id,
            unit_name: summary.unit_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InterestListResponse {
    pub interests: Vec<InterestResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendationResponse {
    /// e.g. `MATCH_COMPLETE`
    pub strategy: String,
    /// e.g. `COURSE+UNIT+DAYS`
    pub tier: String,
    pub priority: u8,
    pub offering_id: u64,
    pub course_id: u64,
    pub course_title: String,
    pub knowledge_area: String,
    pub modality: String,
    pub unit_id: u64,
    pub unit_name: Option<String>,
    pub created_at: NaiveDate,
    pub starts_at: Option<NaiveDate>,
    /// Day codes, e.g. `SEG-QUA`
    pub days: String,
    /// Shift names, e.g. `NOTURNO`
    pub shifts: String,
    pub distance_km: Option<f64>,
    pub similarity: Option<f32>,
    pub professional_area: Option<String>,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(row: Recommendation) -> Self {
        Self {
            strategy: row.strategy.to_string(),
            tier: row.tier.to_string(),
            priority: row.priority,
            offering_id: row.offering.offering_id,
            course_id: row.offering.course_id,
            course_title: row.offering.course_title,
            knowledge_area: row.offering.knowledge_area,
            modality: row.offering.modality,
            unit_id: row.offering.unit_id,
            unit_name: row.offering.unit_name,
            created_at: row.offering.created_at,
            starts_at: row.offering.starts_at,
            days: row.offering.schedule.days.to_string(),
            shifts: row.offering.schedule.shifts.to_string(),
            distance_km: row.distance_km,
            similarity: row.similarity,
            professional_area: row.professional_area,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendationsResponse {
    pub interest: InterestResponse,
    /// `ranked` or `no_recommendations`
    pub status: String,
    pub count: usize,
    /// Rows per strategy label
    pub distribution: BTreeMap<String, usize>,
    pub recommendations: Vec<RecommendationResponse>,
}

impl RecommendationsResponse {
    /// `None` for an unknown interest
    pub fn from_outcome(interest: InterestSummary, outcome: RecommendationOutcome) -> Option<Self> {
        let (status, rows) = match outcome {
            RecommendationOutcome::NotFound => return None,
            RecommendationOutcome::NoRecommendations => ("no_recommendations", Vec::new()),
            RecommendationOutcome::Ranked(rows) => ("ranked", rows),
        };

        let distribution = recommender::summarize(&rows)
            .into_iter()
            .map(|(strategy, count)| (strategy.to_string(), count))
            .collect();

        Some(Self {
            interest: interest.into(),
            status: status.to_string(),
            count: rows.len(),
            distribution,
            recommendations: rows.into_iter().map(Into::into).collect(),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDemandResponse {
    pub course_title: String,
    pub interests: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub courses: usize,
    pub units: usize,
    pub offerings: usize,
    pub interests: usize,
    pub professional_tracks: usize,
    pub top_courses: Vec<CourseDemandResponse>,
    pub interests_by_modality: BTreeMap<String, usize>,
}

impl From<CatalogStats> for StatsResponse {
    fn from(stats: CatalogStats) -> Self {
        Self {
            courses: stats.courses,
            units: stats.units,
            offerings: stats.offerings,
            interests: stats.interests,
            professional_tracks: stats.professional_tracks,
            top_courses: stats
                .top_courses
                .into_iter()
                .map(|demand| CourseDemandResponse {
                    course_title: demand.course_title,
                    interests: demand.interests,
                })
                .collect(),
            interests_by_modality: stats.interests_by_modality,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReloadResponse {
    pub courses: usize,
    pub offerings: usize,
    pub interests: usize,
}
