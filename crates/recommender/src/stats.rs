use crate::reference::ReferenceData;
use models::recommendation::{Recommendation, Strategy};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const TOP_COURSES: usize = 5;

/// Number of interests recorded for one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseDemand {
    pub course_title: String,
    pub interests: usize,
}

/// Overview of a catalog snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub courses: usize,
    pub units: usize,
    pub offerings: usize,
    pub interests: usize,
    pub professional_tracks: usize,
    /// Most requested courses, highest demand first
    pub top_courses: Vec<CourseDemand>,
    /// Interests per course modality
    pub interests_by_modality: BTreeMap<String, usize>,
}

impl CatalogStats {
    pub fn collect(reference: &ReferenceData) -> Self {
        let mut demand: HashMap<String, usize> = HashMap::new();
        let mut interests_by_modality = BTreeMap::new();

        for interest in reference.interests() {
            let (title, modality) = match reference.course(interest.course_id) {
                Some(course) => (course.title.clone(), course.modality.clone()),
                None => (format!("Course {}", interest.course_id), "UNKNOWN".to_string()),
            };
            *demand.entry(title).or_default() += 1;
            *interests_by_modality.entry(modality).or_default() += 1;
        }

        let mut top_courses: Vec<CourseDemand> = demand
            .into_iter()
            .map(|(course_title, interests)| CourseDemand {
                course_title,
                interests,
            })
            .collect();
        top_courses.sort_by(|a, b| {
            b.interests
                .cmp(&a.interests)
                .then_with(|| a.course_title.cmp(&b.course_title))
        });
        top_courses.truncate(TOP_COURSES);

        Self {
            courses: reference.courses().count(),
            units: reference.units().count(),
            offerings: reference.offerings().len(),
            interests: reference.interests().len(),
            professional_tracks: reference.tracks().len(),
            top_courses,
            interests_by_modality,
        }
    }
}

/// Counts recommendations per strategy, every strategy present
pub fn summarize(recommendations: &[Recommendation]) -> BTreeMap<Strategy, usize> {
    let mut counts: BTreeMap<Strategy, usize> =
        Strategy::all().into_iter().map(|s| (s, 0)).collect();

    for recommendation in recommendations {
        *counts.entry(recommendation.strategy).or_default() += 1;
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::fixtures::{course, unit};
    use chrono::NaiveDate;
    use models::{
        catalog::ProfessionalTrack,
        offering::Interest,
        schedule::Schedule,
    };

    fn interest(id: u64, course_id: u64) -> Interest {
        Interest {
            id,
            student_id: id * 10,
            course_id,
            unit_id: 1,
            interest_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            schedule: Schedule::default(),
        }
    }

    #[test]
    fn counts_and_demand() {
        let reference = ReferenceData::new(
            vec![
                course(1, "Tecnologia", "Programador Web", "PRESENCIAL"),
                course(2, "Tecnologia", "Montador", "EAD"),
            ],
            vec![unit(1, None)],
            vec![ProfessionalTrack {
                area: "Informatica".to_string(),
                course_ids: [1, 2].into_iter().collect(),
            }],
            vec![],
            vec![interest(1, 2), interest(2, 1), interest(3, 2), interest(4, 9)],
        );

        let stats = CatalogStats::collect(&reference);

        assert_eq!(stats.courses, 2);
        assert_eq!(stats.interests, 4);
        assert_eq!(stats.professional_tracks, 1);
        assert_eq!(
            stats.top_courses[0],
            CourseDemand {
                course_title: "Montador".to_string(),
                interests: 2
            }
        );
        assert_eq!(stats.top_courses.len(), 3);
        assert_eq!(stats.interests_by_modality["EAD"], 2);
        assert_eq!(stats.interests_by_modality["UNKNOWN"], 1);
    }

    #[test]
    fn summary_lists_every_strategy() {
        let counts = summarize(&[]);
        assert_eq!(counts.len(), 5);
        assert!(counts.values().all(|&n| n == 0));
    }
}
