//! Merges the per-strategy candidate lists of one interest into a ranked list.

use crate::{reference::ReferenceData, strategies::Candidate};
use models::{
    offering::Interest,
    recommendation::{Recommendation, Strategy},
};
use serde::Serialize;
use std::cmp::Ordering;

/// The output of one strategy for one interest
#[derive(Debug, Clone)]
pub struct StrategyRun {
    pub strategy: Strategy,
    pub candidates: Vec<Candidate>,
}

/// Result of a recommendation request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "recommendations", rename_all = "snake_case")]
pub enum RecommendationOutcome {
    /// The interest id is not in the snapshot
    NotFound,
    /// Every strategy came back empty
    NoRecommendations,
    /// Ranked rows; may be empty when the similarity floor removed them all
    Ranked(Vec<Recommendation>),
}

impl RecommendationOutcome {
    /// The ranked rows, empty for the other outcomes
    pub fn recommendations(&self) -> &[Recommendation] {
        match self {
            Self::Ranked(rows) => rows,
            _ => &[],
        }
    }

    pub fn into_recommendations(self) -> Vec<Recommendation> {
        match self {
            Self::Ranked(rows) => rows,
            _ => Vec::new(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Joins, ranks and filters the strategy outputs of one interest.
///
/// Rows are sorted by priority, then by distance (a missing distance counts
/// as 0), then by descending similarity. Rows carrying a similarity at or
/// below `similarity_floor` are dropped afterwards.
pub fn assemble(
    reference: &ReferenceData,
    interest: &Interest,
    runs: Vec<StrategyRun>,
    similarity_floor: f32,
) -> RecommendationOutcome {
    if runs.iter().all(|run| run.candidates.is_empty()) {
        return RecommendationOutcome::NoRecommendations;
    }

    let summary = reference.interest_summary(interest);

    let mut rows: Vec<Recommendation> = runs
        .into_iter()
        .flat_map(|run| {
            let strategy = run.strategy;
            run.candidates
                .into_iter()
                .map(move |candidate| (strategy, candidate))
        })
        .filter_map(|(strategy, candidate)| {
            let view = reference
                .offering(candidate.offering_id)
                .and_then(|offering| reference.offering_view(offering));
            let Some(offering) = view else {
                log::warn!(
                    "Offering {} returned by {} is missing from the catalog",
                    candidate.offering_id,
                    strategy
                );
                return None;
            };

            Some(Recommendation {
                strategy,
                tier: candidate.tier,
                priority: strategy.priority(),
                offering,
                distance_km: candidate.distance_km,
                similarity: candidate.similarity,
                professional_area: candidate.professional_area,
                interest: summary.clone(),
            })
        })
        .collect();

    rows.sort_by(compare_rows);
    rows.retain(|row| row.similarity.is_none_or(|score| score > similarity_floor));

    RecommendationOutcome::Ranked(rows)
}

fn compare_rows(a: &Recommendation, b: &Recommendation) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| {
            a.distance_km
                .unwrap_or(0.0)
                .total_cmp(&b.distance_km.unwrap_or(0.0))
        })
        .then_with(|| match (a.similarity, b.similarity) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}
