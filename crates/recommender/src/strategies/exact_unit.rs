use super::{
    Candidate, MatchContext, MatchStrategy, TierRule, any_schedule, assign_tiers, days_and_shifts,
    days_only,
};
use crate::error::StrategyError;
use models::{
    offering::{Interest, Offering},
    recommendation::{MatchTier, Strategy},
};

const TIERS: [TierRule; 3] = [
    (MatchTier::CourseUnitDaysShifts, days_and_shifts),
    (MatchTier::CourseUnitDays, days_only),
    (MatchTier::CourseUnit, any_schedule),
];

/// Same course at the interest's own unit
pub struct ExactUnitMatcher;

impl MatchStrategy for ExactUnitMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::MatchComplete
    }

    fn find(
        &self,
        ctx: &MatchContext<'_>,
        interest: &Interest,
    ) -> Result<Vec<Candidate>, StrategyError> {
        let pool: Vec<&Offering> = ctx
            .reference
            .offerings_of_course(interest.course_id)
            .filter(|offering| offering.unit_id == interest.unit_id)
            .filter(|offering| offering.is_eligible_for(interest))
            .collect();

        Ok(assign_tiers(&pool, interest, &TIERS)
            .into_iter()
            .map(|(tier, offering)| Candidate::new(offering.id, tier))
            .collect())
    }
}
