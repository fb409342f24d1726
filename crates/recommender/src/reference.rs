use models::{
    catalog::{Coordinates, Course, CourseId, ProfessionalTrack, Unit, UnitId},
    offering::{Interest, InterestId, Offering, OfferingId},
    recommendation::{InterestSummary, OfferingView},
};
use std::collections::{BTreeSet, HashMap};

/// Immutable, indexed view over the normalised catalog tables
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    courses: HashMap<CourseId, Course>,
    units: HashMap<UnitId, Unit>,
    tracks: Vec<ProfessionalTrack>,
    offerings: Vec<Offering>,
    offerings_by_course: HashMap<CourseId, Vec<usize>>,
    offering_positions: HashMap<OfferingId, usize>,
    interests: Vec<Interest>,
    interest_positions: HashMap<InterestId, usize>,
}

impl ReferenceData {
    /// Builds the lookup indices.
    ///
    /// Offerings of courses missing from the catalog are dropped. Track members
    /// whose catalog status bars them from tracks are removed; members that are
    /// not in the catalog at all are kept. When offering or interest ids
    /// repeat, the first record wins lookups.
    pub fn new(
        courses: Vec<Course>,
        units: Vec<Unit>,
        tracks: Vec<ProfessionalTrack>,
        offerings: Vec<Offering>,
        interests: Vec<Interest>,
    ) -> Self {
        let courses: HashMap<CourseId, Course> = courses.into_iter().map(|c| (c.id, c)).collect();
        let units = units.into_iter().map(|u| (u.id, u)).collect();

        let tracks = tracks
            .into_iter()
            .map(|track| ProfessionalTrack {
                course_ids: track
                    .course_ids
                    .into_iter()
                    .filter(|id| {
                        courses
                            .get(id)
                            .is_none_or(|course| course.status.is_track_eligible())
                    })
                    .collect(),
                ..track
            })
            .filter(|track| !track.course_ids.is_empty())
            .collect();

        let total_offerings = offerings.len();
        let offerings: Vec<Offering> = offerings
            .into_iter()
            .filter(|offering| courses.contains_key(&offering.course_id))
            .collect();
        if offerings.len() < total_offerings {
            log::warn!(
                "Dropped {} offerings of courses missing from the catalog",
                total_offerings - offerings.len()
            );
        }

        let mut offerings_by_course: HashMap<CourseId, Vec<usize>> = HashMap::new();
        let mut offering_positions = HashMap::new();
        for (position, offering) in offerings.iter().enumerate() {
            offerings_by_course
                .entry(offering.course_id)
                .or_default()
                .push(position);
            offering_positions.entry(offering.id).or_insert(position);
        }

        let mut interest_positions = HashMap::new();
        for (position, interest) in interests.iter().enumerate() {
            interest_positions.entry(interest.id).or_insert(position);
        }

        Self {
            courses,
            units,
            tracks,
            offerings,
            offerings_by_course,
            offering_positions,
            interests,
            interest_positions,
        }
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.get(&id)
    }

    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Coordinates of a unit, `None` when the unit is unknown or has none on file
    pub fn unit_coordinates(&self, id: UnitId) -> Option<Coordinates> {
        self.units.get(&id).and_then(|unit| unit.coordinates)
    }

    pub fn tracks(&self) -> &[ProfessionalTrack] {
        &self.tracks
    }

    /// Every track the course belongs to
    pub fn tracks_containing(&self, course_id: CourseId) -> impl Iterator<Item = &ProfessionalTrack> {
        self.tracks
            .iter()
            .filter(move |track| track.contains(course_id))
    }

    pub fn offering(&self, id: OfferingId) -> Option<&Offering> {
        self.offering_positions
            .get(&id)
            .map(|&position| &self.offerings[position])
    }

    pub fn offerings(&self) -> &[Offering] {
        &self.offerings
    }

    /// Offerings of one course, in catalog order
    pub fn offerings_of_course(&self, course_id: CourseId) -> impl Iterator<Item = &Offering> {
        self.offerings_by_course
            .get(&course_id)
            .into_iter()
            .flatten()
            .map(|&position| &self.offerings[position])
    }

    /// Offerings of any of the given courses, in catalog order
    pub fn offerings_of_courses<'a>(
        &'a self,
        course_ids: impl IntoIterator<Item = &'a CourseId>,
    ) -> impl Iterator<Item = &'a Offering> {
        let positions: BTreeSet<usize> = course_ids
            .into_iter()
            .filter_map(|id| self.offerings_by_course.get(id))
            .flatten()
            .copied()
            .collect();

        positions
            .into_iter()
            .map(move |position| &self.offerings[position])
    }

    pub fn interest(&self, id: InterestId) -> Option<&Interest> {
        self.interest_positions
            .get(&id)
            .map(|&position| &self.interests[position])
    }

    pub fn interests(&self) -> &[Interest] {
        &self.interests
    }

    /// Joins an offering with its course and unit
    pub fn offering_view(&self, offering: &Offering) -> Option<OfferingView> {
        let course = self.course(offering.course_id)?;

        Some(OfferingView {
            offering_id: offering.id,
            course_id: course.id,
            course_title: course.title.clone(),
            knowledge_area: course.knowledge_area.clone(),
            modality: course.modality.clone(),
            unit_id: offering.unit_id,
            unit_name: self.unit(offering.unit_id).map(|unit| unit.name.clone()),
            created_at: offering.created_at,
            starts_at: offering.starts_at,
            schedule: offering.schedule,
        })
    }

    /// Joins an interest with its course and unit
    pub fn interest_summary(&self, interest: &Interest) -> InterestSummary {
        let course = self.course(interest.course_id);

        InterestSummary {
            interest_id: interest.id,
            student_id: interest.student_id,
            course_id: interest.course_id,
            course_title: course.map(|c| c.title.clone()),
            knowledge_area: course.map(|c| c.knowledge_area.clone()),
            modality: course.map(|c| c.modality.clone()),
            unit_id: interest.unit_id,
            unit_name: self.unit(interest.unit_id).map(|unit| unit.name.clone()),
        }
    }
}
