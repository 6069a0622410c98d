use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::domain::{Difficulty, FinalScore, Rating};

/// Completed games needed before the next scenario opens.
pub const UNLOCK_MIN_GAMES: usize = 2;
/// Minimum percentage for a game to count towards unlocking.
pub const UNLOCK_MIN_PERCENTAGE: u32 = 50;
/// On-disk layout version of [`ProgressBook`].
pub const PROGRESS_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedGame {
    pub scenario: String,
    pub difficulty: Difficulty,
    pub score: u32,
    pub total: usize,
    pub percentage: u32,
    pub rating: Rating,
    pub completed_at: DateTime<Utc>,
}

impl CompletedGame {
    pub fn from_score(scenario: &str, difficulty: Difficulty, score: &FinalScore) -> Self {
        Self {
            scenario: scenario.to_string(),
            difficulty,
            score: score.score,
            total: score.total,
            percentage: score.percentage,
            rating: score.rating,
            completed_at: Utc::now(),
        }
    }
}

/// Unlock rule: at least two completed games that scored 50% or better.
pub fn unlock_next_scenario<'a>(games: impl IntoIterator<Item = &'a CompletedGame>) -> bool {
    games
        .into_iter()
        .filter(|g| g.percentage >= UNLOCK_MIN_PERCENTAGE)
        .count()
        >= UNLOCK_MIN_GAMES
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressState {
    pub player: String,
    pub completed: Vec<CompletedGame>,
    pub unlocked: Vec<String>,
}

impl ProgressState {
    pub fn new(player: impl Into<String>, first_scenario: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            completed: vec![],
            unlocked: vec![first_scenario.into()],
        }
    }

    pub fn is_unlocked(&self, scenario: &str) -> bool {
        self.unlocked.iter().any(|s| s == scenario)
    }

    /// Record a finished game. When the unlock rule fires for `scenario`,
    /// the scenario after it in `order` is unlocked and returned.
    pub fn record(
        &mut self,
        scenario: &str,
        difficulty: Difficulty,
        score: &FinalScore,
        order: &[&str],
    ) -> Option<String> {
        self.completed
            .push(CompletedGame::from_score(scenario, difficulty, score));

        let games = self.completed.iter().filter(|g| g.scenario == scenario);
        if !unlock_next_scenario(games) {
            return None;
        }

        let next = order
            .iter()
            .position(|s| *s == scenario)
            .and_then(|i| order.get(i + 1))?;
        if self.is_unlocked(next) {
            return None;
        }
        self.unlocked.push(next.to_string());
        info!(player = %self.player, scenario, next = *next, "progress.unlocked");
        Some(next.to_string())
    }
}

/// Progress of every player sharing one progress file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressBook {
    pub version: u32,
    pub players: BTreeMap<String, ProgressState>,
}

impl Default for ProgressBook {
    fn default() -> Self {
        Self {
            version: PROGRESS_VERSION,
            players: BTreeMap::new(),
        }
    }
}

impl ProgressBook {
    /// The player's record, created with only `first_scenario` unlocked if new.
    pub fn player_mut(&mut self, player: &str, first_scenario: &str) -> &mut ProgressState {
        self.players
            .entry(player.to_string())
            .or_insert_with(|| ProgressState::new(player, first_scenario))
    }

    pub fn player(&self, player: &str) -> Option<&ProgressState> {
        self.players.get(player)
    }
}

pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// A missing file is an empty book. A book written by another layout
    /// version is refused rather than misread.
    pub fn load(&self) -> Result<ProgressBook> {
        if !self.path.exists() {
            return Ok(ProgressBook::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        let value: serde_json::Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        let version = value.get("version").and_then(|v| v.as_u64());
        if version != Some(u64::from(PROGRESS_VERSION)) {
            bail!(
                "{} has progress version {:?}, expected {}",
                self.path.display(),
                version,
                PROGRESS_VERSION
            );
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn save(&self, book: &ProgressBook) -> Result<()> {
        let raw = serde_json::to_string_pretty(book)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: [&str; 3] = ["accommodation", "job-offer", "phone-contract"];

    fn summary(score: u32, total: usize) -> FinalScore {
        let percentage = (100.0 * score as f64 / total as f64).round() as u32;
        FinalScore {
            score,
            total,
            percentage,
            rating: Rating::from_percentage(percentage),
            history: vec![],
        }
    }

    #[test]
    fn unlock_needs_two_passing_games() {
        let mut st = ProgressState::new("sam", "accommodation");
        assert_eq!(st.record("accommodation", Difficulty::A1, &summary(2, 10), &ORDER), None);
        assert_eq!(st.record("accommodation", Difficulty::A1, &summary(5, 10), &ORDER), None);
        assert!(!st.is_unlocked("job-offer"));

        let next = st.record("accommodation", Difficulty::A1, &summary(7, 10), &ORDER);
        assert_eq!(next.as_deref(), Some("job-offer"));
        assert!(st.is_unlocked("job-offer"));

        // Already unlocked; nothing new to report.
        assert_eq!(st.record("accommodation", Difficulty::A1, &summary(9, 10), &ORDER), None);
    }

    #[test]
    fn games_from_other_scenarios_do_not_count() {
        let mut st = ProgressState::new("sam", "accommodation");
        st.record("job-offer", Difficulty::B1, &summary(10, 10), &ORDER);
        assert_eq!(st.record("accommodation", Difficulty::B1, &summary(10, 10), &ORDER), None);
    }

    #[test]
    fn last_scenario_unlocks_nothing() {
        let mut st = ProgressState::new("sam", "phone-contract");
        st.record("phone-contract", Difficulty::A2, &summary(8, 8), &ORDER);
        assert_eq!(st.record("phone-contract", Difficulty::A2, &summary(8, 8), &ORDER), None);
    }

    #[test]
    fn store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("progress.json"));
        assert!(store.load().unwrap().players.is_empty());

        let mut book = store.load().unwrap();
        book.player_mut("sam", "accommodation")
            .record("accommodation", Difficulty::A1, &summary(3, 4), &ORDER);
        store.save(&book).unwrap();

        let loaded = store.load().unwrap();
        let sam = loaded.player("sam").unwrap();
        assert_eq!(sam.player, "sam");
        assert_eq!(sam.completed, book.players["sam"].completed);
        assert_eq!(sam.unlocked, vec!["accommodation".to_string()]);
    }

    #[test]
    fn players_sharing_a_file_keep_separate_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("progress.json"));

        let mut book = store.load().unwrap();
        let sam = book.player_mut("sam", "accommodation");
        sam.record("accommodation", Difficulty::B1, &summary(9, 10), &ORDER);
        sam.record("accommodation", Difficulty::B1, &summary(8, 10), &ORDER);
        assert!(sam.is_unlocked("job-offer"));
        store.save(&book).unwrap();

        let mut book = store.load().unwrap();
        let alex = book.player_mut("alex", "accommodation");
        assert_eq!(alex.player, "alex");
        assert!(alex.completed.is_empty());
        assert!(!alex.is_unlocked("job-offer"));
        alex.record("accommodation", Difficulty::A1, &summary(1, 10), &ORDER);
        store.save(&book).unwrap();

        let book = store.load().unwrap();
        assert_eq!(book.player("sam").unwrap().completed.len(), 2);
        assert_eq!(book.player("alex").unwrap().completed.len(), 1);
        assert!(book.player("sam").unwrap().is_unlocked("job-offer"));
    }

    #[test]
    fn load_refuses_other_layout_versions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let store = ProgressStore::new(&path);

        // Single-player layout from before the book existed.
        fs::write(&path, r#"{"version": 1, "player": "sam", "completed": [], "unlocked": []}"#)
            .unwrap();
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("expected 2"), "{err}");

        fs::write(&path, r#"{"players": {}}"#).unwrap();
        assert!(store.load().is_err());
    }
}
