use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MAX_HIGH_SCORES;

const APP_DIR_NAME: &str = "arcade-snake";
const SCORE_FILE_NAME: &str = "highscores.json";

/// One ranked line of the high-score table.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

/// Failures reported by a ledger backend.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("high-score storage unavailable: {0}")]
    Io(#[from] io::Error),
    #[error("high-score file is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ranked list of best historical scores, shared across sessions.
pub trait HighScoreLedger {
    /// Whether `score` would earn a place in the table.
    fn is_high_score(&self, score: u32) -> Result<bool, LedgerError>;

    fn add_score(&mut self, name: &str, score: u32) -> Result<(), LedgerError>;

    fn reset_scores(&mut self) -> Result<(), LedgerError>;

    /// Entries in descending score order, at most [`MAX_HIGH_SCORES`].
    fn list_scores(&self) -> Vec<ScoreEntry>;
}

/// In-memory table holding the ranking rules.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryLedger {
    entries: Vec<ScoreEntry>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < MAX_HIGH_SCORES || self.entries.iter().any(|e| score > e.score)
    }

    fn insert(&mut self, name: &str, score: u32) {
        // Ties keep the older entry first.
        let index = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            index,
            ScoreEntry {
                name: name.to_owned(),
                score,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }
}

impl HighScoreLedger for MemoryLedger {
    fn is_high_score(&self, score: u32) -> Result<bool, LedgerError> {
        Ok(self.qualifies(score))
    }

    fn add_score(&mut self, name: &str, score: u32) -> Result<(), LedgerError> {
        self.insert(name, score);
        Ok(())
    }

    fn reset_scores(&mut self) -> Result<(), LedgerError> {
        self.entries.clear();
        Ok(())
    }

    fn list_scores(&self) -> Vec<ScoreEntry> {
        self.entries.clone()
    }
}

/// Returns the platform-correct high-score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// Ledger persisted as pretty JSON after every change.
#[derive(Debug, Clone)]
pub struct JsonLedger {
    path: PathBuf,
    table: MemoryLedger,
}

impl JsonLedger {
    /// Opens the table at `path`.
    ///
    /// A missing file is an empty table (first run). A file that exists but
    /// cannot be read or parsed is an error, so the caller can warn and fall
    /// back before entering raw terminal mode.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let table = load_table(&path)?;
        info!(
            "loaded {} high scores from {}",
            table.entries.len(),
            path.display()
        );
        Ok(Self { path, table })
    }

    /// Starts an empty table that will be written to `path` on first change.
    #[must_use]
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: MemoryLedger::new(),
        }
    }

    fn save(&self) -> Result<(), LedgerError> {
        save_table(&self.path, &self.table).inspect_err(|error| {
            warn!("failed to save high scores to {}: {error}", self.path.display());
        })
    }
}

impl HighScoreLedger for JsonLedger {
    fn is_high_score(&self, score: u32) -> Result<bool, LedgerError> {
        self.table.is_high_score(score)
    }

    fn add_score(&mut self, name: &str, score: u32) -> Result<(), LedgerError> {
        self.table.add_score(name, score)?;
        self.save()
    }

    fn reset_scores(&mut self) -> Result<(), LedgerError> {
        self.table.reset_scores()?;
        self.save()
    }

    fn list_scores(&self) -> Vec<ScoreEntry> {
        self.table.list_scores()
    }
}

fn load_table(path: &Path) -> Result<MemoryLedger, LedgerError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(MemoryLedger::new()),
        Err(e) => return Err(e.into()),
    };

    let mut table: MemoryLedger = serde_json::from_str(&raw)?;
    table.normalize();
    Ok(table)
}

fn save_table(path: &Path, table: &MemoryLedger) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(table)?;
    fs::write(path, json)?;
    Ok(())
}
