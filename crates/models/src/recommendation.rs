use crate::{
    catalog::{CourseId, UnitId},
    offering::{InterestId, OfferingId, StudentId},
    schedule::Schedule,
};
use chrono::NaiveDate;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// The five matching strategies, declared from most to least specific
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    /// Same course at the same unit
    MatchComplete,
    /// Same course at another unit
    OtherUnit,
    /// Other courses of the same professional track at the same unit
    ProfessionalTrack,
    /// Semantically similar courses at the same unit
    SemanticSimilarity,
    /// Semantically similar distance-learning courses anywhere
    EadModality,
}

impl Strategy {
    /// Priority rank, 1 being the most specific
    pub fn priority(self) -> u8 {
        match self {
            Self::MatchComplete => 1,
            Self::OtherUnit => 2,
            Self::ProfessionalTrack => 3,
            Self::SemanticSimilarity => 4,
            Self::EadModality => 5,
        }
    }

    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// All strategies in priority order
    pub fn all() -> Vec<Strategy> {
        Strategy::iter().collect()
    }
}

/// Specificity level of a match within a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr)]
pub enum MatchTier {
    #[serde(rename = "COURSE+UNIT+DAYS+SHIFTS")]
    #[strum(serialize = "COURSE+UNIT+DAYS+SHIFTS")]
    CourseUnitDaysShifts,

    #[serde(rename = "COURSE+UNIT+DAYS")]
    #[strum(serialize = "COURSE+UNIT+DAYS")]
    CourseUnitDays,

    #[serde(rename = "COURSE+UNIT")]
    #[strum(serialize = "COURSE+UNIT")]
    CourseUnit,

    #[serde(rename = "COURSE+DAYS+SHIFTS")]
    #[strum(serialize = "COURSE+DAYS+SHIFTS")]
    CourseDaysShifts,

    #[serde(rename = "COURSE+DAYS")]
    #[strum(serialize = "COURSE+DAYS")]
    CourseDays,

    #[serde(rename = "COURSE")]
    #[strum(serialize = "COURSE")]
    Course,

    #[serde(rename = "PROFESSIONAL_AREA+SAME_UNIT")]
    #[strum(serialize = "PROFESSIONAL_AREA+SAME_UNIT")]
    ProfessionalAreaSameUnit,

    #[serde(rename = "SIMILAR_TITLE+SAME_UNIT")]
    #[strum(serialize = "SIMILAR_TITLE+SAME_UNIT")]
    SimilarTitleSameUnit,

    #[serde(rename = "SIMILAR_EAD_COURSE")]
    #[strum(serialize = "SIMILAR_EAD_COURSE")]
    SimilarEadCourse,
}

impl MatchTier {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

/// The interest a recommendation answers, with its catalog details resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterestSummary {
    pub interest_id: InterestId,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub course_title: Option<String>,
    pub knowledge_area: Option<String>,
    pub modality: Option<String>,
    pub unit_id: UnitId,
    pub unit_name: Option<String>,
}

/// An offering joined with its course and unit details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferingView {
    pub offering_id: OfferingId,
    pub course_id: CourseId,
    pub course_title: String,
    pub knowledge_area: String,
    pub modality: String,
    pub unit_id: UnitId,
    pub unit_name: Option<String>,
    pub created_at: NaiveDate,
    pub starts_at: Option<NaiveDate>,
    pub schedule: Schedule,
}

/// One ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub strategy: Strategy,
    pub tier: MatchTier,
    pub priority: u8,
    pub offering: OfferingView,
    /// Great-circle distance between the interest's unit and the offering's unit
    pub distance_km: Option<f64>,
    /// Cosine similarity between the two course texts
    pub similarity: Option<f32>,
    /// Area of practice that linked the two courses
    pub professional_area: Option<String>,
    pub interest: InterestSummary,
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_strategy_priorities_follow_declaration_order() {
        let priorities: Vec<u8> = Strategy::all().into_iter().map(Strategy::priority).collect();
        assert_eq!(priorities, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_strategy_labels() {
        assert_eq!(Strategy::MatchComplete.as_str(), "MATCH_COMPLETE");
        assert_eq!(Strategy::EadModality.to_string(), "EAD_MODALITY");
        assert_eq!(
            Strategy::from_str("PROFESSIONAL_TRACK").unwrap(),
            Strategy::ProfessionalTrack
        );
        assert_eq!(
            serde_json::to_string(&Strategy::SemanticSimilarity).unwrap(),
            r#""SEMANTIC_SIMILARITY""#
        );
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!(
            MatchTier::CourseUnitDaysShifts.as_str(),
            "COURSE+UNIT+DAYS+SHIFTS"
        );
        assert_eq!(MatchTier::Course.to_string(), "COURSE");
        assert_eq!(
            serde_json::to_string(&MatchTier::SimilarTitleSameUnit).unwrap(),
            r#""SIMILAR_TITLE+SAME_UNIT""#
        );
    }
}
