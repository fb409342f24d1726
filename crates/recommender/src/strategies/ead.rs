use super::{Candidate, MatchContext, MatchStrategy, semantic::similar_offerings};
use crate::error::StrategyError;
use models::{
    offering::Interest,
    recommendation::{MatchTier, Strategy},
};

/// Distance-learning courses similar to the interest's course, at any unit
pub struct EadModalityMatcher;

impl MatchStrategy for EadModalityMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::EadModality
    }

    fn find(
        &self,
        ctx: &MatchContext<'_>,
        interest: &Interest,
    ) -> Result<Vec<Candidate>, StrategyError> {
        similar_offerings(
            ctx,
            interest,
            ctx.corpus.distance_learning(),
            MatchTier::SimilarEadCourse,
            |offering| {
                ctx.reference
                    .course(offering.course_id)
                    .is_some_and(|course| course.is_distance_learning())
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        reference::ReferenceData,
        strategies::fixtures::{Fixture, course, interest, offering, unit},
    };
    use models::schedule::Schedule;

    fn fixture() -> Fixture {
        Fixture::new(ReferenceData::new(
            vec![
                course(101, "Tecnologia", "Programador Web", "PRESENCIAL"),
                course(102, "Tecnologia", "Programador Web", "EAD"),
                course(103, "Tecnologia", "Programador de Sistemas", "PRESENCIAL"),
                course(104, "Tecnologia", "Programador Web", "SEMIPRESENCIAL EAD"),
            ],
            vec![unit(1, None), unit(2, None), unit(3, None)],
            vec![],
            vec![
                offering(1, 102, 2, Schedule::default()),
                offering(2, 103, 1, Schedule::default()),
                offering(3, 104, 3, Schedule::default()),
            ],
            vec![],
        ))
    }

    #[test]
    fn distance_learning_offerings_at_any_unit() {
        let fx = fixture();
        let candidates = EadModalityMatcher
            .find(&fx.ctx(), &interest(101, 1))
            .unwrap();

        let ids: Vec<u64> = candidates.iter().map(|c| c.offering_id).collect();
        // Both EAD courses share the query text and score the same
        assert_eq!(ids, vec![1, 3]);
        assert!(candidates.iter().all(|c| c.tier == MatchTier::SimilarEadCourse));
        assert!(
            candidates
                .iter()
                .all(|c| (c.similarity.unwrap() - 1.0).abs() < 1e-5)
        );
    }

    #[test]
    fn an_ead_course_never_recommends_itself() {
        let fx = fixture();
        let candidates = EadModalityMatcher
            .find(&fx.ctx(), &interest(102, 1))
            .unwrap();

        let ids: Vec<u64> = candidates.iter().map(|c| c.offering_id).collect();
        assert_eq!(ids, vec![3]);
    }
}
