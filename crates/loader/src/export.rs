use crate::{error::LoadError, tables};
use csv::Writer;
use models::{offering::InterestId, recommendation::Recommendation};
use std::{
    fs::{self, File},
    path::Path,
};

/// Columns written by [`write_recommendations`]
pub const RECOMMENDATION_HEADERS: [&str; 17] = [
    "interest_id",
    "strategy",
    "tier",
    "priority",
    "offering_id",
    "course_title",
    "knowledge_area",
    "modality",
    "unit_name",
    "starts_at",
    "student_id",
    "interest_course",
    "interest_unit",
    "distance_km",
    "similarity",
    "professional_area",
    "schedule",
];

/// Ensures a directory exists, creating it if necessary
///
/// # Arguments
/// * `dir_path` - Path to the directory
pub fn ensure_dir(dir_path: &Path) -> Result<(), LoadError> {
    if !dir_path.exists() {
        fs::create_dir_all(dir_path).map_err(|e| LoadError::io(dir_path, e))?;
    }

    Ok(())
}

/// Creates a CSV writer for the specified file, creating its parent directory
///
/// # Arguments
/// * `path` - File to create
/// * `headers` - Column headers for the CSV
pub fn create_csv_writer(path: &Path, headers: &[&str]) -> Result<Writer<File>, LoadError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    let file = File::create(path).map_err(|e| LoadError::io(path, e))?;
    let mut writer = Writer::from_writer(file);
    writer
        .write_record(headers)
        .map_err(|e| LoadError::csv(path, e))?;

    Ok(writer)
}

/// Writes recommendations to a CSV file, returning the number of rows written
pub fn write_recommendations(path: &Path, rows: &[Recommendation]) -> Result<usize, LoadError> {
    let mut writer = create_csv_writer(path, &RECOMMENDATION_HEADERS)?;

    for row in rows {
        let record = [
            row.interest.interest_id.to_string(),
            row.strategy.to_string(),
            row.tier.to_string(),
            row.priority.to_string(),
            row.offering.offering_id.to_string(),
            row.offering.course_title.clone(),
            row.offering.knowledge_area.clone(),
            row.offering.modality.clone(),
            row.offering.unit_name.clone().unwrap_or_default(),
            row.offering
                .starts_at
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            row.interest.student_id.to_string(),
            row.interest.course_title.clone().unwrap_or_default(),
            row.interest.unit_name.clone().unwrap_or_default(),
            row.distance_km
                .map(|km| format!("{km:.2}"))
                .unwrap_or_default(),
            row.similarity
                .map(|score| format!("{score:.4}"))
                .unwrap_or_default(),
            row.professional_area.clone().unwrap_or_default(),
            format!("{} {}", row.offering.schedule.days, row.offering.schedule.shifts),
        ];
        writer
            .write_record(&record)
            .map_err(|e| LoadError::csv(path, e))?;
    }

    writer.flush().map_err(|e| LoadError::io(path, e))?;
    Ok(rows.len())
}

/// Reads the interest ids of a batch file.
///
/// The file needs an `interest_id` (or `COD_INTERESSE`) column; blank cells
/// are skipped.
pub fn read_batch_ids(path: &Path) -> Result<Vec<InterestId>, LoadError> {
    let mut reader = tables::open(path)?;
    let headers = reader.headers().map_err(|e| LoadError::csv(path, e))?.clone();

    let column = tables::column_index(&headers, |name| {
        name == "INTEREST_ID" || name == "COD_INTERESSE"
    })
    .ok_or_else(|| LoadError::MissingColumn {
        path: path.to_path_buf(),
        column: "interest_id".to_string(),
    })?;

    let mut ids = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| LoadError::csv(path, e))?;
        let Some(raw) = record.get(column).map(str::trim).filter(|r| !r.is_empty()) else {
            continue;
        };

        let id = raw.parse().map_err(|_| LoadError::Value {
            path: path.to_path_buf(),
            line: index + 2,
            message: format!("invalid interest id {raw:?}"),
        })?;
        ids.push(id);
    }

    Ok(ids)
}
