//! Loading of the catalog tables and export of recommendation results.

pub mod config;
pub mod error;
pub mod export;
mod normalize;
pub mod tables;

pub use config::SourceConfig;
pub use error::LoadError;
pub use export::{read_batch_ids, write_recommendations};

use recommender::ReferenceData;
use std::time::Instant;

/// Reads the five source tables and builds the reference data from them
pub fn load_reference(config: &SourceConfig) -> Result<ReferenceData, LoadError> {
    let started = Instant::now();

    let courses = tables::read_courses(&config.courses_path())?;
    let units = tables::read_units(&config.units_path())?;
    let tracks = tables::read_tracks(&config.tracks_path())?;
    let offerings = tables::read_offerings(&config.offerings_path, config.offerings_year)?;
    let interests = tables::read_interests(&config.interests_path)?;

    log::info!(
        "Loaded {} courses, {} units, {} tracks, {} offerings and {} interests in {:?}",
        courses.len(),
        units.len(),
        tracks.len(),
        offerings.len(),
        interests.len(),
        started.elapsed()
    );

    Ok(ReferenceData::new(courses, units, tracks, offerings, interests))
}
