use crate::{
    catalog::{CourseId, UnitId},
    schedule::Schedule,
};
use chrono::NaiveDate;
use serde::Serialize;

pub type OfferingId = u64;
pub type InterestId = u64;
pub type StudentId = u64;

/// One scheduled instance of a course at a unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offering {
    pub id: OfferingId,
    pub course_id: CourseId,
    pub unit_id: UnitId,
    pub created_at: NaiveDate,
    pub starts_at: Option<NaiveDate>,
    pub schedule: Schedule,
}

impl Offering {
    /// Offerings created before the interest was registered are never recommended
    pub fn is_eligible_for(&self, interest: &Interest) -> bool {
        self.created_at >= interest.interest_date
    }
}

/// A student's registered wish to take a course at a unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interest {
    pub id: InterestId,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub unit_id: UnitId,
    pub interest_date: NaiveDate,
    pub schedule: Schedule,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schedule::{DaySet, ShiftSet};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_eligibility_is_inclusive() {
        let interest = Interest {
            id: 1,
            student_id: 7,
            course_id: 101,
            unit_id: 1,
            interest_date: date(2025, 3, 10),
            schedule: Schedule::new(DaySet::MONDAY, ShiftSet::EVENING),
        };
        let mut offering = Offering {
            id: 10,
            course_id: 101,
            unit_id: 1,
            created_at: date(2025, 3, 10),
            starts_at: None,
            schedule: Schedule::default(),
        };

        assert!(offering.is_eligible_for(&interest));

        offering.created_at = date(2025, 3, 9);
        assert!(!offering.is_eligible_for(&interest));
    }
}
