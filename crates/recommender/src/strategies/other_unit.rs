use super::{
    Candidate, MatchContext, MatchStrategy, TierRule, any_schedule, assign_tiers, days_and_shifts,
    days_only,
};
use crate::{error::StrategyError, geo::haversine_km};
use models::{
    offering::{Interest, Offering},
    recommendation::{MatchTier, Strategy},
};

const TIERS: [TierRule; 3] = [
    (MatchTier::CourseDaysShifts, days_and_shifts),
    (MatchTier::CourseDays, days_only),
    (MatchTier::Course, any_schedule),
];

/// Same course at any other unit, with the distance from the interest's unit.
///
/// Nothing is returned when the interest's unit has no coordinates on file.
pub struct OtherUnitMatcher;

impl MatchStrategy for OtherUnitMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::OtherUnit
    }

    fn find(
        &self,
        ctx: &MatchContext<'_>,
        interest: &Interest,
    ) -> Result<Vec<Candidate>, StrategyError> {
        let Some(origin) = ctx.reference.unit_coordinates(interest.unit_id) else {
            log::debug!(
                "Unit {} of interest {} has no coordinates, skipping other-unit matches",
                interest.unit_id,
                interest.id
            );
            return Ok(Vec::new());
        };

        let pool: Vec<&Offering> = ctx
            .reference
            .offerings_of_course(interest.course_id)
            .filter(|offering| offering.unit_id != interest.unit_id)
            .filter(|offering| offering.is_eligible_for(interest))
            .collect();

        Ok(assign_tiers(&pool, interest, &TIERS)
            .into_iter()
            .map(|(tier, offering)| Candidate {
                distance_km: ctx
                    .reference
                    .unit_coordinates(offering.unit_id)
                    .map(|destination| haversine_km(origin, destination)),
                ..Candidate::new(offering.id, tier)
            })
            .collect())
    }
}
