//! The five matching strategies.
//!
//! Each strategy reads the shared snapshot and returns its own candidate
//! list; none of them sees the output of another.

mod ead;
mod exact_unit;
mod other_unit;
mod semantic;
mod track;

pub use ead::EadModalityMatcher;
pub use exact_unit::ExactUnitMatcher;
pub use other_unit::OtherUnitMatcher;
pub use semantic::SemanticSimilarityMatcher;
pub use track::ProfessionalTrackMatcher;

use crate::{
    config::EngineConfig, embedding::CorpusIndex, embedding::Embedder, error::StrategyError,
    reference::ReferenceData,
};
use models::{
    offering::{Interest, Offering, OfferingId},
    recommendation::{MatchTier, Strategy},
};
use std::collections::HashSet;

/// An offering picked by a strategy, before it is joined and ranked
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub offering_id: OfferingId,
    pub tier: MatchTier,
    pub distance_km: Option<f64>,
    pub similarity: Option<f32>,
    pub professional_area: Option<String>,
}

impl Candidate {
    pub fn new(offering_id: OfferingId, tier: MatchTier) -> Self {
        Self {
            offering_id,
            tier,
            distance_km: None,
            similarity: None,
            professional_area: None,
        }
    }
}

/// Everything a strategy may read
pub struct MatchContext<'a> {
    pub reference: &'a ReferenceData,
    pub corpus: &'a CorpusIndex,
    pub embedder: &'a dyn Embedder,
    pub config: &'a EngineConfig,
}

pub trait MatchStrategy: Send + Sync {
    fn strategy(&self) -> Strategy;

    /// Candidates for one interest, most specific tier first
    fn find(
        &self,
        ctx: &MatchContext<'_>,
        interest: &Interest,
    ) -> Result<Vec<Candidate>, StrategyError>;
}

/// The five strategies in priority order
pub fn default_strategies() -> Vec<Box<dyn MatchStrategy>> {
    vec![
        Box::new(ExactUnitMatcher),
        Box::new(OtherUnitMatcher),
        Box::new(ProfessionalTrackMatcher),
        Box::new(SemanticSimilarityMatcher),
        Box::new(EadModalityMatcher),
    ]
}

/// A tier label and the test an offering must pass to enter it
pub(crate) type TierRule = (MatchTier, fn(&Offering, &Interest) -> bool);

pub(crate) fn days_and_shifts(offering: &Offering, interest: &Interest) -> bool {
    offering.schedule.matches_days(&interest.schedule)
        && offering.schedule.matches_shifts(&interest.schedule)
}

pub(crate) fn days_only(offering: &Offering, interest: &Interest) -> bool {
    offering.schedule.matches_days(&interest.schedule)
}

pub(crate) fn any_schedule(_: &Offering, _: &Interest) -> bool {
    true
}

/// Assigns each offering of `pool` to the first tier whose rule it passes.
///
/// Offering ids are claimed tier by tier, so an id never appears twice in
/// the output even if the pool repeats it.
pub(crate) fn assign_tiers<'a>(
    pool: &[&'a Offering],
    interest: &Interest,
    tiers: &[TierRule],
) -> Vec<(MatchTier, &'a Offering)> {
    let mut claimed: HashSet<OfferingId> = HashSet::new();
    let mut matches = Vec::new();

    for &(tier, rule) in tiers {
        let tier_matches: Vec<&Offering> = pool
            .iter()
            .copied()
            .filter(|offering| !claimed.contains(&offering.id) && rule(offering, interest))
            .collect();

        for offering in tier_matches {
            if claimed.insert(offering.id) {
                matches.push((tier, offering));
            }
        }
    }

    matches
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::{
        config::EngineConfig,
        embedding::{CorpusIndex, HashEmbedder},
        reference::ReferenceData,
    };
    use chrono::NaiveDate;
    use models::{
        catalog::{Coordinates, Course, CourseStatus, Unit},
        offering::{Interest, Offering},
        schedule::{DaySet, Schedule, ShiftSet},
    };

    pub fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    pub fn course(id: u64, area: &str, title: &str, modality: &str) -> Course {
        Course {
            id,
            title: title.to_string(),
            knowledge_area: area.to_string(),
            modality: modality.to_string(),
            status: CourseStatus::Active,
        }
    }

    pub fn unit(id: u64, coordinates: Option<(f64, f64)>) -> Unit {
        Unit {
            id,
            name: format!("Unit {id}"),
            coordinates: coordinates.map(|(latitude, longitude)| Coordinates {
                latitude,
                longitude,
            }),
        }
    }

    pub fn offering(id: u64, course_id: u64, unit_id: u64, schedule: Schedule) -> Offering {
        Offering {
            id,
            course_id,
            unit_id,
            created_at: date(15),
            starts_at: Some(date(31)),
            schedule,
        }
    }

    /// Monday/Wednesday evenings
    pub fn interest(course_id: u64, unit_id: u64) -> Interest {
        Interest {
            id: 1,
            student_id: 900,
            course_id,
            unit_id,
            interest_date: date(10),
            schedule: Schedule::new(DaySet::MONDAY | DaySet::WEDNESDAY, ShiftSet::EVENING),
        }
    }

    pub struct Fixture {
        pub reference: ReferenceData,
        pub corpus: CorpusIndex,
        pub embedder: HashEmbedder,
        pub config: EngineConfig,
    }

    impl Fixture {
        pub fn new(reference: ReferenceData) -> Self {
            let embedder = HashEmbedder::default();
            let corpus = CorpusIndex::build(&reference, &embedder).unwrap();
            Self {
                reference,
                corpus,
                embedder,
                config: EngineConfig::default(),
            }
        }

        pub fn ctx(&self) -> super::MatchContext<'_> {
            super::MatchContext {
                reference: &self.reference,
                corpus: &self.corpus,
                embedder: &self.embedder,
                config: &self.config,
            }
        }
    }
}
