use chrono::Local;
use clap::Parser;
use loader::SourceConfig;
use models::offering::InterestId;
use recommender::{EngineConfig, RecommendationEngine};
use std::{
    error::Error,
    io,
    path::{Path, PathBuf},
};

mod interactive;
mod report;

use report::{render_outcome, render_stats};

#[derive(Parser, Debug)]
#[command(
    name = "recommend",
    about = "Recommend course offerings for recorded student interests"
)]
struct Cli {
    /// Interest to generate recommendations for
    #[arg(long, conflicts_with = "batch")]
    interest: Option<InterestId>,

    /// CSV file receiving the recommendations of --interest
    #[arg(long, requires = "interest")]
    output: Option<PathBuf>,

    /// CSV file with an interest_id column to process in one run
    #[arg(long)]
    batch: Option<PathBuf>,

    /// Directory receiving the batch export
    #[arg(long, env = "RECOMMENDER_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Print catalog statistics
    #[arg(long, default_value_t = false)]
    stats: bool,

    /// List the first interests of the catalog
    #[arg(long, default_value_t = false)]
    list: bool,
}

impl Cli {
    fn is_interactive(&self) -> bool {
        self.interest.is_none() && self.batch.is_none() && !self.stats && !self.list
    }
}

fn run_batch(
    engine: &RecommendationEngine,
    batch: &Path,
    output_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let ids = loader::read_batch_ids(batch)?;
    log::info!("Processing {} interests from {}", ids.len(), batch.display());

    let mut rows = Vec::new();
    let mut missing = 0;
    for (id, outcome) in engine.generate_batch(&ids) {
        if outcome.is_not_found() {
            missing += 1;
        }
        log::debug!("Interest {id}: {} rows", outcome.recommendations().len());
        rows.extend(outcome.into_recommendations());
    }

    let path = output_dir.join(format!(
        "recommendations_batch_{}.csv",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    let written = loader::write_recommendations(&path, &rows)?;

    println!(
        "{} interests processed ({missing} not found), {written} recommendations written to {}",
        ids.len(),
        path.display()
    );
    Ok(path)
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let sources = SourceConfig::from_env()?;
    let missing = sources.missing_files();
    if !missing.is_empty() {
        for path in &missing {
            log::error!("Missing source file {}", path.display());
        }
        return Err(format!("{} source files are missing", missing.len()).into());
    }

    let config = EngineConfig::from_env();
    let reference = loader::load_reference(&sources)?;
    let engine = RecommendationEngine::from_config(reference, config)?;

    if cli.is_interactive() {
        let stdin = io::stdin();
        return Ok(interactive::run(&engine, stdin.lock(), io::stdout())?);
    }

    if cli.stats {
        print!("{}", render_stats(&engine.stats()));
    }

    if cli.list {
        for interest in engine.list_available_interests() {
            println!(
                "{:>8}  {:<40} {}",
                interest.interest_id,
                interest.course_title.as_deref().unwrap_or("-"),
                interest.unit_name.as_deref().unwrap_or("-"),
            );
        }
    }

    if let Some(id) = cli.interest {
        let outcome = engine.generate_recommendations(id);
        print!("{}", render_outcome(id, &outcome));

        if let Some(path) = &cli.output {
            let written = loader::write_recommendations(path, outcome.recommendations())?;
            println!("{written} recommendations written to {}", path.display());
        }
    }

    if let Some(batch) = &cli.batch {
        run_batch(&engine, batch, &cli.output_dir)?;
    }

    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(err) = run(Cli::parse()) {
        log::error!("{err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use recommender::HashEmbedder;
    use std::sync::Arc;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags_is_interactive() {
        let cli = Cli::try_parse_from(["recommend"]).unwrap();
        assert!(cli.is_interactive());

        let cli = Cli::try_parse_from(["recommend", "--stats"]).unwrap();
        assert!(!cli.is_interactive());
    }

    #[test]
    fn test_output_requires_interest() {
        assert!(Cli::try_parse_from(["recommend", "--output", "out.csv"]).is_err());
        assert!(Cli::try_parse_from(["recommend", "--interest", "7", "--batch", "b.csv"]).is_err());

        let cli = Cli::try_parse_from(["recommend", "--interest", "7", "--output", "out.csv"])
            .unwrap();
        assert_eq!(cli.interest, Some(7));
    }

    #[test]
    fn test_batch_export() {
        use chrono::NaiveDate;
        use models::{
            catalog::{Course, CourseStatus, Unit},
            offering::{Interest, Offering},
            schedule::Schedule,
        };
        use recommender::ReferenceData;

        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let reference = ReferenceData::new(
            vec![Course {
                id: 101,
                title: "Programador Web".to_string(),
                knowledge_area: "Tecnologia".to_string(),
                modality: "PRESENCIAL".to_string(),
                status: CourseStatus::Active,
            }],
            vec![Unit {
                id: 1,
                name: "Centro".to_string(),
                coordinates: None,
            }],
            vec![],
            vec![Offering {
                id: 10,
                course_id: 101,
                unit_id: 1,
                created_at: date,
                starts_at: None,
                schedule: Schedule::default(),
            }],
            vec![Interest {
                id: 7,
                student_id: 900,
                course_id: 101,
                unit_id: 1,
                interest_date: date,
                schedule: Schedule::default(),
            }],
        );
        let engine = RecommendationEngine::new(
            reference,
            Arc::new(HashEmbedder::default()),
            EngineConfig::default(),
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let batch = dir.path().join("batch.csv");
        std::fs::write(&batch, "interest_id\n7\n99\n").unwrap();

        let path = run_batch(&engine, &batch, &dir.path().join("out")).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
