use crate::report::{render_outcome, render_stats};
use recommender::RecommendationEngine;
use std::io::{self, BufRead, Write};

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Recommend(u64),
    List,
    Stats,
    Exit,
    Empty,
    Unknown(String),
}

impl From<&str> for Command {
    fn from(line: &str) -> Self {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "" => Self::Empty,
            "list" => Self::List,
            "stats" => Self::Stats,
            "exit" | "quit" => Self::Exit,
            _ => line
                .parse()
                .map(Self::Recommend)
                .unwrap_or_else(|_| Self::Unknown(line.to_string())),
        }
    }
}

/// Reads commands until `exit` or end of input
pub fn run<R: BufRead, W: Write>(
    engine: &RecommendationEngine,
    input: R,
    mut output: W,
) -> io::Result<()> {
    writeln!(
        output,
        "Enter an interest id, `list`, `stats` or `exit`"
    )?;

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };

        match Command::from(line.as_str()) {
            Command::Recommend(id) => {
                let outcome = engine.generate_recommendations(id);
                write!(output, "{}", render_outcome(id, &outcome))?;
            }
            Command::List => {
                for interest in engine.list_available_interests() {
                    writeln!(
                        output,
                        "{:>8}  {:<40} {}",
                        interest.interest_id,
                        interest.course_title.as_deref().unwrap_or("-"),
                        interest.unit_name.as_deref().unwrap_or("-"),
                    )?;
                }
            }
            Command::Stats => write!(output, "{}", render_stats(&engine.stats()))?,
            Command::Exit => break,
            Command::Empty => {}
            Command::Unknown(text) => writeln!(output, "Unknown command: {text}")?,
        }
    }

    Ok(())
}
