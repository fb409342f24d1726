use serde::Serialize;
use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use strum::{EnumIter, EnumProperty, IntoEnumIterator};

pub type CourseId = u64;
pub type UnitId = u64;

/// Catalog status of a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, EnumProperty, EnumIter)]
pub enum CourseStatus {
    #[strum(props(display = "ACTIVE", parse = "ATIVO"))]
    Active,

    #[strum(props(display = "DISCONTINUED", parse = "DESCONTINUADO"))]
    Discontinued,

    #[strum(props(display = "BEING_REDESIGNED", parse = "EM_REFORMULACAO"))]
    BeingRedesigned,

    #[strum(props(display = "UNAVAILABLE", parse = "INDISPONIVEL"))]
    Unavailable,

    /// Any other status, kept verbatim
    Other(String),
}

impl CourseStatus {
    /// Whether the course belongs in the similarity corpus
    pub fn is_embeddable(&self) -> bool {
        !matches!(
            self,
            Self::Discontinued | Self::BeingRedesigned | Self::Unavailable
        )
    }

    /// Whether the course can be offered as a professional-track sibling.
    /// Unavailable courses stay eligible here.
    pub fn is_track_eligible(&self) -> bool {
        !matches!(self, Self::Discontinued | Self::BeingRedesigned)
    }
}

impl FromStr for CourseStatus {
    type Err = ();

    /// Accepts both the catalog spelling (`DESCONTINUADO`) and the display name (`DISCONTINUED`)
    fn from_str(status: &str) -> Result<Self, Self::Err> {
        let status = status.trim().to_uppercase();

        Self::iter()
            .find(|v| {
                v.get_str("parse") == Some(status.as_str())
                    || v.get_str("display") == Some(status.as_str())
            })
            .or_else(|| Some(Self::Other(status.clone())))
            .ok_or(())
    }
}

impl From<String> for CourseStatus {
    fn from(status: String) -> Self {
        Self::from_str(&status).unwrap_or(Self::Other(status))
    }
}

impl Display for CourseStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Other(status) => write!(f, "{status}"),
            _ => write!(f, "{}", self.get_str("display").unwrap_or_default()),
        }
    }
}

/// A course in the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub knowledge_area: String,
    /// Delivery modality, e.g. "PRESENCIAL", "EAD", "SEMIPRESENCIAL/EAD"
    pub modality: String,
    pub status: CourseStatus,
}

impl Course {
    /// The text used to place the course in the similarity corpus
    pub fn area_title(&self) -> String {
        format!("{} - {}", self.knowledge_area, self.title)
    }

    /// Distance-learning courses have "EAD" somewhere in their modality
    pub fn is_distance_learning(&self) -> bool {
        self.modality.to_uppercase().contains("EAD")
    }
}

/// Latitude/longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Returns `None` unless both values are present and finite
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) if latitude.is_finite() && longitude.is_finite() => {
                Some(Self {
                    latitude,
                    longitude,
                })
            }
            _ => None,
        }
    }
}

/// A campus where offerings take place
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub coordinates: Option<Coordinates>,
}

/// Courses grouped under one area of professional practice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessionalTrack {
    pub area: String,
    pub course_ids: BTreeSet<CourseId>,
}

impl ProfessionalTrack {
    pub fn contains(&self, course_id: CourseId) -> bool {
        self.course_ids.contains(&course_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn course(modality: &str) -> Course {
        Course {
            id: 1,
            title: "Eletricista Predial".to_string(),
            knowledge_area: "Eletroeletrônica".to_string(),
            modality: modality.to_string(),
            status: CourseStatus::Active,
        }
    }

    #[test]
    fn test_course_status_from_str() {
        assert_eq!(
            CourseStatus::from_str("DESCONTINUADO").unwrap(),
            CourseStatus::Discontinued
        );
        assert_eq!(
            CourseStatus::from_str(" em_reformulacao ").unwrap(),
            CourseStatus::BeingRedesigned
        );
        assert_eq!(
            CourseStatus::from_str("UNAVAILABLE").unwrap(),
            CourseStatus::Unavailable
        );
        assert_eq!(
            CourseStatus::from_str("SUSPENSO").unwrap(),
            CourseStatus::Other("SUSPENSO".to_string())
        );
    }

    #[test]
    fn test_course_status_eligibility() {
        assert!(CourseStatus::Active.is_embeddable());
        assert!(CourseStatus::Other("NOVO".into()).is_embeddable());
        assert!(!CourseStatus::Unavailable.is_embeddable());
        assert!(CourseStatus::Unavailable.is_track_eligible());
        assert!(!CourseStatus::Discontinued.is_track_eligible());
        assert!(!CourseStatus::BeingRedesigned.is_track_eligible());
    }

    #[test]
    fn test_course_status_display() {
        assert_eq!(CourseStatus::BeingRedesigned.to_string(), "BEING_REDESIGNED");
        assert_eq!(CourseStatus::Other("X".into()).to_string(), "X");
    }

    #[test]
    fn test_area_title() {
        assert_eq!(
            course("PRESENCIAL").area_title(),
            "Eletroeletrônica - Eletricista Predial"
        );
    }

    #[test]
    fn test_distance_learning() {
        assert!(course("EAD").is_distance_learning());
        assert!(course("Semipresencial/ead").is_distance_learning());
        assert!(!course("PRESENCIAL").is_distance_learning());
    }

    #[test]
    fn test_coordinates_from_parts() {
        assert!(Coordinates::from_parts(Some(-23.5), Some(-46.6)).is_some());
        assert!(Coordinates::from_parts(Some(-23.5), None).is_none());
        assert!(Coordinates::from_parts(Some(f64::NAN), Some(1.0)).is_none());
    }
}
