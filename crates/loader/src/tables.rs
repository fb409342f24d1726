//! Readers for the five source tables.
//!
//! Interests and offerings come as `;`-separated exports; the structure
//! tables (courses, units, tracks) as CSV with either separator.

use crate::{
    error::LoadError,
    normalize::{decode, detect_delimiter, non_empty, parse_coordinate, parse_date, parse_flag},
};
use chrono::{Datelike, NaiveDate};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use models::{
    catalog::{Coordinates, Course, CourseId, ProfessionalTrack, Unit},
    offering::{Interest, Offering},
    schedule::{DaySet, Schedule, ShiftSet},
};
use serde::{Deserialize, de::DeserializeOwned};
use std::{
    collections::BTreeMap,
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

#[derive(Debug, Deserialize)]
struct CourseRow {
    #[serde(rename = "COD_CURSO")]
    id: CourseId,
    #[serde(rename = "TITULO")]
    title: String,
    #[serde(rename = "AREA_CONHECIMENTO", default)]
    knowledge_area: String,
    #[serde(rename = "MODALIDADE", default)]
    modality: String,
    #[serde(rename = "STATUS", default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct UnitRow {
    #[serde(rename = "COD_UNIDADE")]
    id: u64,
    #[serde(rename = "NOME_UNIDADE", default)]
    name: String,
    #[serde(rename = "LATITUDE", default)]
    latitude: String,
    #[serde(rename = "LONGITUDE", default)]
    longitude: String,
}

#[derive(Debug, Deserialize)]
struct OfferingRow {
    #[serde(rename = "COD_OFERTA")]
    id: u64,
    #[serde(rename = "COD_CURSO")]
    course_id: CourseId,
    #[serde(rename = "COD_UNIDADE")]
    unit_id: u64,
    #[serde(rename = "DATA_CRIACAO")]
    created_at: String,
    #[serde(rename = "DATA_INICIO", default)]
    starts_at: String,
    #[serde(rename = "DIAS_SEMANA", default)]
    days: String,
    #[serde(rename = "TURNO", default)]
    shift: String,
}

#[derive(Debug, Deserialize)]
struct InterestRow {
    #[serde(rename = "COD_INTERESSE")]
    id: u64,
    #[serde(rename = "COD_ALUNO")]
    student_id: u64,
    #[serde(rename = "COD_CURSO")]
    course_id: CourseId,
    #[serde(rename = "COD_UNIDADE")]
    unit_id: u64,
    #[serde(rename = "DATA_INTERESSE")]
    interest_date: String,
    #[serde(rename = "TURNO_MANHA", default)]
    morning: String,
    #[serde(rename = "TURNO_TARDE", default)]
    afternoon: String,
    #[serde(rename = "TURNO_NOITE", default)]
    evening: String,
    #[serde(rename = "DIA_SEG", default)]
    monday: String,
    #[serde(rename = "DIA_TER", default)]
    tuesday: String,
    #[serde(rename = "DIA_QUA", default)]
    wednesday: String,
    #[serde(rename = "DIA_QUI", default)]
    thursday: String,
    #[serde(rename = "DIA_SEX", default)]
    friday: String,
    #[serde(rename = "DIA_SAB", default)]
    saturday: String,
}

/// Opens a CSV file, guessing its encoding and separator
pub(crate) fn open(path: &Path) -> Result<Reader<Cursor<String>>, LoadError> {
    let bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
    let text = decode(bytes);
    let delimiter = detect_delimiter(&text);

    Ok(ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(Cursor::new(text)))
}

/// Deserializes every row, pairing it with its line number for error reports
fn rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<(usize, T)>, LoadError> {
    let mut reader = open(path)?;

    reader
        .deserialize()
        .enumerate()
        // Line 1 is the header
        .map(|(index, row)| {
            row.map(|row| (index + 2, row))
                .map_err(|e| LoadError::csv(path, e))
        })
        .collect()
}

struct RowContext<'a> {
    path: &'a Path,
    line: usize,
}

impl RowContext<'_> {
    fn error(&self, message: String) -> LoadError {
        LoadError::Value {
            path: PathBuf::from(self.path),
            line: self.line,
            message,
        }
    }

    fn date(&self, column: &str, raw: &str) -> Result<NaiveDate, LoadError> {
        parse_date(raw).ok_or_else(|| self.error(format!("unrecognised date {raw:?} in {column}")))
    }

    fn flag(&self, column: &str, raw: &str) -> Result<bool, LoadError> {
        parse_flag(raw).ok_or_else(|| self.error(format!("expected S or N in {column}, got {raw:?}")))
    }
}

pub fn read_courses(path: &Path) -> Result<Vec<Course>, LoadError> {
    Ok(rows::<CourseRow>(path)?
        .into_iter()
        .map(|(_, row)| Course {
            id: row.id,
            title: row.title,
            knowledge_area: row.knowledge_area,
            modality: row.modality,
            status: row.status.into(),
        })
        .collect())
}

pub fn read_units(path: &Path) -> Result<Vec<Unit>, LoadError> {
    Ok(rows::<UnitRow>(path)?
        .into_iter()
        .map(|(_, row)| Unit {
            id: row.id,
            name: row.name,
            coordinates: Coordinates::from_parts(
                parse_coordinate(&row.latitude),
                parse_coordinate(&row.longitude),
            ),
        })
        .collect())
}

/// Reads the track table: one row per area, course ids spread over every
/// column whose name contains `CURSO`. Rows of the same area are merged.
pub fn read_tracks(path: &Path) -> Result<Vec<ProfessionalTrack>, LoadError> {
    let mut reader = open(path)?;
    let headers = reader.headers().map_err(|e| LoadError::csv(path, e))?.clone();

    let area_column = column_index(&headers, |name| name == "AREA_PROFISSIONAL").ok_or_else(
        || LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: "AREA_PROFISSIONAL".to_string(),
        },
    )?;
    let course_columns: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| name.to_uppercase().contains("CURSO"))
        .map(|(index, _)| index)
        .collect();

    let mut tracks: BTreeMap<String, ProfessionalTrack> = BTreeMap::new();

    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| LoadError::csv(path, e))?;
        let ctx = RowContext {
            path,
            line: index + 2,
        };

        let Some(area) = record.get(area_column).and_then(non_empty) else {
            continue;
        };
        let track = tracks
            .entry(area.to_string())
            .or_insert_with(|| ProfessionalTrack {
                area: area.to_string(),
                course_ids: Default::default(),
            });

        for &column in &course_columns {
            let Some(raw) = record.get(column).and_then(non_empty) else {
                continue;
            };
            let id = parse_course_id(raw)
                .ok_or_else(|| ctx.error(format!("invalid course id {raw:?}")))?;
            track.course_ids.insert(id);
        }
    }

    Ok(tracks.into_values().collect())
}

/// Reads offerings, keeping only those created in `year` when one is given
pub fn read_offerings(path: &Path, year: Option<i32>) -> Result<Vec<Offering>, LoadError> {
    let mut offerings = Vec::new();

    for (line, row) in rows::<OfferingRow>(path)? {
        let ctx = RowContext { path, line };

        let created_at = ctx.date("DATA_CRIACAO", &row.created_at)?;
        if year.is_some_and(|year| created_at.year() != year) {
            continue;
        }

        let starts_at = match non_empty(&row.starts_at) {
            Some(raw) => Some(ctx.date("DATA_INICIO", raw)?),
            None => None,
        };

        offerings.push(Offering {
            id: row.id,
            course_id: row.course_id,
            unit_id: row.unit_id,
            created_at,
            starts_at,
            schedule: Schedule::new(
                parse_days(&ctx, &row.days),
                parse_shifts(&ctx, &row.shift),
            ),
        });
    }

    Ok(offerings)
}

pub fn read_interests(path: &Path) -> Result<Vec<Interest>, LoadError> {
    rows::<InterestRow>(path)?
        .into_iter()
        .map(|(line, row)| {
            let ctx = RowContext { path, line };

            let days = DaySet::from_flags([
                ctx.flag("DIA_SEG", &row.monday)?,
                ctx.flag("DIA_TER", &row.tuesday)?,
                ctx.flag("DIA_QUA", &row.wednesday)?,
                ctx.flag("DIA_QUI", &row.thursday)?,
                ctx.flag("DIA_SEX", &row.friday)?,
                ctx.flag("DIA_SAB", &row.saturday)?,
            ]);
            let shifts = ShiftSet::from_flags([
                ctx.flag("TURNO_MANHA", &row.morning)?,
                ctx.flag("TURNO_TARDE", &row.afternoon)?,
                ctx.flag("TURNO_NOITE", &row.evening)?,
            ]);

            Ok(Interest {
                id: row.id,
                student_id: row.student_id,
                course_id: row.course_id,
                unit_id: row.unit_id,
                interest_date: ctx.date("DATA_INTERESSE", &row.interest_date)?,
                schedule: Schedule::new(days, shifts),
            })
        })
        .collect()
}

/// Unknown day codes are dropped with a warning, the rest of the list is kept
fn parse_days(ctx: &RowContext<'_>, raw: &str) -> DaySet {
    raw.split('-')
        .filter(|code| !code.trim().is_empty())
        .fold(DaySet::NONE, |days, code| match code.parse::<DaySet>() {
            Ok(day) => days | day,
            Err(err) => {
                log::warn!("{} line {}: {err}", ctx.path.display(), ctx.line);
                days
            }
        })
}

fn parse_shifts(ctx: &RowContext<'_>, raw: &str) -> ShiftSet {
    raw.parse().unwrap_or_else(|err| {
        log::warn!("{} line {}: {err}", ctx.path.display(), ctx.line);
        ShiftSet::NONE
    })
}

pub(crate) fn column_index(headers: &StringRecord, matches: impl Fn(&str) -> bool) -> Option<usize> {
    headers
        .iter()
        .position(|name| matches(name.trim().to_uppercase().as_str()))
}

/// Course ids sometimes come out of spreadsheets as floats (`123.0`)
fn parse_course_id(raw: &str) -> Option<CourseId> {
    raw.parse().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.fract() == 0.0 && *value >= 0.0)
            .map(|value| value as CourseId)
    })
}
