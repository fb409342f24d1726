use models::{offering::InterestId, recommendation::Recommendation};
use recommender::{CatalogStats, RecommendationOutcome, summarize};
use std::fmt::Write;

/// Rows shown per outcome, the rest only go to the CSV export
pub const PREVIEW_ROWS: usize = 5;

pub fn render_outcome(interest_id: InterestId, outcome: &RecommendationOutcome) -> String {
    let mut out = String::new();

    let rows = match outcome {
        RecommendationOutcome::NotFound => {
            let _ = writeln!(out, "Interest {interest_id} not found");
            return out;
        }
        RecommendationOutcome::NoRecommendations => {
            let _ = writeln!(out, "No recommendations for interest {interest_id}");
            return out;
        }
        RecommendationOutcome::Ranked(rows) => rows,
    };

    if let Some(first) = rows.first() {
        let interest = &first.interest;
        let _ = writeln!(
            out,
            "Interest {} (student {}): {} at {}",
            interest.interest_id,
            interest.student_id,
            interest.course_title.as_deref().unwrap_or("unknown course"),
            interest.unit_name.as_deref().unwrap_or("unknown unit"),
        );
    }

    let _ = writeln!(out, "{} recommendations", rows.len());
    for (strategy, count) in summarize(rows).into_iter().filter(|(_, count)| *count > 0) {
        let _ = writeln!(out, "  {strategy:<20} {count}");
    }

    for (rank, row) in rows.iter().take(PREVIEW_ROWS).enumerate() {
        let _ = writeln!(out, "{:>2}. {}", rank + 1, render_row(row));
    }

    out
}

fn render_row(row: &Recommendation) -> String {
    let mut line = format!(
        "[{}] {} at {} ({}, {})",
        row.tier,
        row.offering.course_title,
        row.offering.unit_name.as_deref().unwrap_or("-"),
        row.offering.schedule.days,
        row.offering.schedule.shifts,
    );

    if let Some(km) = row.distance_km {
        let _ = write!(line, " {km:.1} km");
    }
    if let Some(score) = row.similarity {
        let _ = write!(line, " similarity {score:.2}");
    }
    if let Some(area) = &row.professional_area {
        let _ = write!(line, " track {area}");
    }

    line
}

pub fn render_stats(stats: &CatalogStats) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Courses:              {}", stats.courses);
    let _ = writeln!(out, "Units:                {}", stats.units);
    let _ = writeln!(out, "Offerings:            {}", stats.offerings);
    let _ = writeln!(out, "Interests:            {}", stats.interests);
    let _ = writeln!(out, "Professional tracks:  {}", stats.professional_tracks);

    let _ = writeln!(out, "Most requested courses:");
    for demand in &stats.top_courses {
        let _ = writeln!(out, "  {:<40} {}", demand.course_title, demand.interests);
    }

    let _ = writeln!(out, "Interests by modality:");
    for (modality, count) in &stats.interests_by_modality {
        let _ = writeln!(out, "  {modality:<40} {count}");
    }

    out
}
