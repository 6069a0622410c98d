use anyhow::Result;
use chrono::{DateTime, Local};
use std::{fs::OpenOptions, io::Write, path::Path};

use crate::domain::{Difficulty, FinalScore};

/// Append a markdown block describing one finished session.
pub fn append_session_summary(
    journal_path: impl AsRef<Path>,
    scenario: &str,
    difficulty: Difficulty,
    summary: &FinalScore,
) -> Result<()> {
    let now: DateTime<Local> = Local::now();

    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(journal_path)?;

    writeln!(f, "## {} ({})\n", scenario, now.to_rfc3339())?;
    writeln!(f, "- Level: {}", difficulty)?;
    writeln!(f, "- Score: {} / {}", summary.score, summary.total)?;
    writeln!(f, "- Percentage: {}%", summary.percentage)?;
    writeln!(f, "- Rating: {}\n", summary.rating)?;

    for (i, record) in summary.history.iter().enumerate() {
        let verdict = if record.user_choice { "legit" } else { "scam" };
        let truth = if record.listing.is_scam { "scam" } else { "legit" };
        let mark = if record.is_correct { "ok" } else { "miss" };
        writeln!(
            f,
            "{}. `{}` answered {} (was {}) [{}]",
            i + 1,
            record.listing.id,
            verdict,
            truth,
            mark
        )?;
    }
    writeln!(f, "\n---\n")?;

    Ok(())
}
