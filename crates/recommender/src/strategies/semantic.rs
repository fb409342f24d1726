use super::{Candidate, MatchContext, MatchStrategy};
use crate::{
    embedding::{EmbeddingIndex, Neighbor},
    error::StrategyError,
};
use models::{
    catalog::CourseId,
    offering::{Interest, Offering},
    recommendation::{MatchTier, Strategy},
};
use std::collections::HashMap;

/// Courses whose "area - title" text is close to the interest's course,
/// offered at the interest's own unit.
pub struct SemanticSimilarityMatcher;

impl MatchStrategy for SemanticSimilarityMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::SemanticSimilarity
    }

    fn find(
        &self,
        ctx: &MatchContext<'_>,
        interest: &Interest,
    ) -> Result<Vec<Candidate>, StrategyError> {
        similar_offerings(
            ctx,
            interest,
            ctx.corpus.full(),
            MatchTier::SimilarTitleSameUnit,
            |offering| offering.unit_id == interest.unit_id,
        )
    }
}

/// Looks up the neighbours of the interest's course in `index` and returns
/// the eligible offerings of those courses that pass `keep`, best neighbour
/// first.
pub(super) fn similar_offerings(
    ctx: &MatchContext<'_>,
    interest: &Interest,
    index: &EmbeddingIndex,
    tier: MatchTier,
    keep: impl Fn(&Offering) -> bool,
) -> Result<Vec<Candidate>, StrategyError> {
    let Some(course) = ctx.reference.course(interest.course_id) else {
        log::debug!(
            "Course {} of interest {} is not in the catalog",
            interest.course_id,
            interest.id
        );
        return Ok(Vec::new());
    };

    if index.is_empty() {
        return Ok(Vec::new());
    }

    // Courses already in the corpus reuse their stored vector
    let neighbors = match ctx.corpus.full().vector_for(course.id) {
        Some(query) => index.nearest(query, course.id, ctx.config.top_n),
        None => {
            let query = ctx
                .embedder
                .embed(&course.area_title())
                .map_err(|source| StrategyError::Embedding {
                    course_id: course.id,
                    source,
                })?;
            index.nearest(&query, course.id, ctx.config.top_n)
        }
    };

    if neighbors.is_empty() {
        return Ok(Vec::new());
    }

    let scores: HashMap<CourseId, f32> = neighbors
        .iter()
        .map(|&Neighbor { course_id, score }| (course_id, score))
        .collect();

    let mut candidates: Vec<(f32, Candidate)> = ctx
        .reference
        .offerings_of_courses(scores.keys())
        .filter(|offering| offering.is_eligible_for(interest))
        .filter(|offering| keep(offering))
        .filter_map(|offering| {
            let score = *scores.get(&offering.course_id)?;
            Some((
                score,
                Candidate {
                    similarity: Some(score),
                    ..Candidate::new(offering.id, tier)
                },
            ))
        })
        .collect();

    candidates.sort_by(|(a, _), (b, _)| b.total_cmp(a));
    Ok(candidates.into_iter().map(|(_, candidate)| candidate).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::EngineConfig,
        embedding::{CorpusIndex, EmbedError, Embedder},
        reference::ReferenceData,
        strategies::fixtures::{Fixture, course, interest, offering, unit},
    };
    use models::{catalog::CourseStatus, schedule::Schedule};

    fn reference() -> ReferenceData {
        ReferenceData::new(
            vec![
                course(101, "Tecnologia", "Programador Web", "PRESENCIAL"),
                course(102, "Tecnologia", "Programador de Sistemas", "PRESENCIAL"),
                course(103, "Gastronomia", "Confeiteiro", "PRESENCIAL"),
            ],
            vec![unit(1, None), unit(2, None)],
            vec![],
            vec![
                offering(1, 102, 1, Schedule::default()),
                offering(2, 102, 2, Schedule::default()),
                offering(3, 101, 1, Schedule::default()),
            ],
            vec![],
        )
    }

    #[test]
    fn same_unit_offerings_of_similar_courses() {
        let fx = Fixture::new(reference());
        let candidates = SemanticSimilarityMatcher
            .find(&fx.ctx(), &interest(101, 1))
            .unwrap();

        // The interest's own course and other units never show up
        let ids: Vec<u64> = candidates.iter().map(|c| c.offering_id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(candidates[0].tier, MatchTier::SimilarTitleSameUnit);
        let score = candidates[0].similarity.unwrap();
        assert!(score > 0.0 && score <= 1.0);
    }

    #[test]
    fn unknown_course_yields_nothing() {
        let fx = Fixture::new(reference());
        assert!(
            SemanticSimilarityMatcher
                .find(&fx.ctx(), &interest(999, 1))
                .unwrap()
                .is_empty()
        );
    }

    struct Broken;

    impl Embedder for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn dimension(&self) -> usize {
            2
        }

        fn embed(&self, _: &str) -> Result<Vec<f32>, EmbedError> {
            Err(EmbedError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn courses_outside_the_corpus_are_embedded_on_demand() {
        let mut courses = vec![course(101, "Tecnologia", "Programador Web", "PRESENCIAL")];
        courses[0].status = CourseStatus::Discontinued;
        let reference = ReferenceData::new(
            courses,
            vec![unit(1, None)],
            vec![],
            vec![],
            vec![],
        );
        let corpus = CorpusIndex::from_parts(
            EmbeddingIndex::from_entries(vec![crate::embedding::IndexEntry {
                course_id: 7,
                text: "x".to_string(),
                vector: vec![1.0, 0.0],
            }]),
            EmbeddingIndex::default(),
        );
        let config = EngineConfig::default();
        let ctx = MatchContext {
            reference: &reference,
            corpus: &corpus,
            embedder: &Broken,
            config: &config,
        };

        let error = SemanticSimilarityMatcher
            .find(&ctx, &interest(101, 1))
            .unwrap_err();
        assert!(matches!(
            error,
            StrategyError::Embedding { course_id: 101, .. }
        ));
    }
}
