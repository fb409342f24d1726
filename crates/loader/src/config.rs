use crate::error::LoadError;
use std::{
    env,
    path::PathBuf,
};

/// Where the five source tables live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub offerings_path: PathBuf,
    pub interests_path: PathBuf,
    /// Directory holding `courses.csv`, `units.csv` and `tracks.csv`
    pub structure_dir: PathBuf,
    /// Keep only offerings created in this year
    pub offerings_year: Option<i32>,
}

impl SourceConfig {
    /// Reads `OFFERINGS_PATH`, `INTERESTS_PATH`, `STRUCTURE_DIR` and the
    /// optional `OFFERINGS_YEAR` from the environment
    pub fn from_env() -> Result<Self, LoadError> {
        let offerings_year = match env::var("OFFERINGS_YEAR") {
            Ok(raw) if !raw.trim().is_empty() => {
                Some(raw.trim().parse().map_err(|_| LoadError::InvalidConfig {
                    key: "OFFERINGS_YEAR",
                    value: raw.clone(),
                })?)
            }
            _ => None,
        };

        Ok(Self {
            offerings_path: required_path("OFFERINGS_PATH")?,
            interests_path: required_path("INTERESTS_PATH")?,
            structure_dir: required_path("STRUCTURE_DIR")?,
            offerings_year,
        })
    }

    pub fn courses_path(&self) -> PathBuf {
        self.structure_dir.join("courses.csv")
    }

    pub fn units_path(&self) -> PathBuf {
        self.structure_dir.join("units.csv")
    }

    pub fn tracks_path(&self) -> PathBuf {
        self.structure_dir.join("tracks.csv")
    }

    /// Source files that do not exist
    pub fn missing_files(&self) -> Vec<PathBuf> {
        [
            self.offerings_path.clone(),
            self.interests_path.clone(),
            self.courses_path(),
            self.units_path(),
            self.tracks_path(),
        ]
        .into_iter()
        .filter(|path| !path.exists())
        .collect()
    }
}

fn required_path(key: &'static str) -> Result<PathBuf, LoadError> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .ok_or(LoadError::MissingConfig(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_tables_live_in_one_directory() {
        let config = SourceConfig {
            offerings_path: "offerings.csv".into(),
            interests_path: "interests.csv".into(),
            structure_dir: "/data/structure".into(),
            offerings_year: None,
        };

        assert_eq!(config.units_path(), PathBuf::from("/data/structure/units.csv"));
        assert_eq!(config.missing_files().len(), 5);
    }

    #[test]
    fn unset_variable_is_reported_by_name() {
        assert!(matches!(
            required_path("LOADER_TEST_UNSET_PATH"),
            Err(LoadError::MissingConfig("LOADER_TEST_UNSET_PATH"))
        ));
    }
}
