use super::{Candidate, MatchContext, MatchStrategy};
use crate::error::StrategyError;
use models::{
    catalog::CourseId,
    offering::Interest,
    recommendation::{MatchTier, Strategy},
};
use std::collections::BTreeSet;

/// Other courses of the same professional track(s), at the interest's unit.
///
/// When the course belongs to several tracks, the siblings of all of them
/// are considered.
pub struct ProfessionalTrackMatcher;

impl MatchStrategy for ProfessionalTrackMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::ProfessionalTrack
    }

    fn find(
        &self,
        ctx: &MatchContext<'_>,
        interest: &Interest,
    ) -> Result<Vec<Candidate>, StrategyError> {
        let siblings: BTreeSet<CourseId> = ctx
            .reference
            .tracks_containing(interest.course_id)
            .flat_map(|track| track.course_ids.iter().copied())
            .filter(|&id| id != interest.course_id)
            .collect();

        if siblings.is_empty() {
            return Ok(Vec::new());
        }

        Ok(ctx
            .reference
            .offerings_of_courses(&siblings)
            .filter(|offering| offering.unit_id == interest.unit_id)
            .filter(|offering| offering.is_eligible_for(interest))
            .map(|offering| Candidate {
                professional_area: ctx
                    .reference
                    .tracks_containing(interest.course_id)
                    .find(|track| track.contains(offering.course_id))
                    .map(|track| track.area.clone()),
                ..Candidate::new(offering.id, MatchTier::ProfessionalAreaSameUnit)
            })
            .collect())
    }
}
