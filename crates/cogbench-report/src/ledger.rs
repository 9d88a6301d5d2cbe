//! Local high-score ledger.
//!
//! Records are kept as one JSON array under a fixed storage name, sorted by
//! score and capped at the ten best across every mode. Storage is behind
//! [`ScoreLedger`] so the tracker runs the same against a file or memory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use cogbench_core::model::{GameKind, GridSize};

/// Name the record array is stored under.
pub const STORAGE_KEY: &str = "ankaraPatternScores";
/// Records kept across all modes.
pub const LEDGER_CAPACITY: usize = 10;
/// Records listed per mode.
pub const RECENT_PER_MODE: usize = 5;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger is not valid JSON: {0}")]
    Malformed(String),

    #[error("failed to encode ledger: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Which board a score belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    #[serde(rename = "3x3")]
    Grid3,
    #[serde(rename = "4x4")]
    Grid4,
    #[serde(rename = "chameleon")]
    Chameleon,
    #[serde(rename = "phonics")]
    Phonics,
}

impl GameMode {
    /// Board for a finished game. Both recall games share the grid boards.
    pub fn for_game(kind: GameKind, grid: GridSize) -> Self {
        match kind {
            GameKind::SequenceRecall | GameKind::TimedRecall => match grid {
                GridSize::Three => GameMode::Grid3,
                GridSize::Four => GameMode::Grid4,
            },
            GameKind::Stroop => GameMode::Chameleon,
            GameKind::Phonics => GameMode::Phonics,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameMode::Grid3 => "3x3",
            GameMode::Grid4 => "4x4",
            GameMode::Chameleon => "chameleon",
            GameMode::Phonics => "phonics",
        })
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "3x3" => Ok(GameMode::Grid3),
            "4x4" => Ok(GameMode::Grid4),
            "chameleon" => Ok(GameMode::Chameleon),
            "phonics" => Ok(GameMode::Phonics),
            other => Err(format!(
                "unknown mode '{other}' (expected 3x3, 4x4, chameleon or phonics)"
            )),
        }
    }
}

/// One saved score. `timestamp` is milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u32,
    pub mode: GameMode,
    pub timestamp: i64,
}

/// Backing store for the ledger.
///
/// `read` returns `Ok(None)` when nothing has been stored yet.
pub trait ScoreLedger {
    fn read(&self) -> Result<Option<Vec<ScoreRecord>>, LedgerError>;
    fn write(&mut self, records: &[ScoreRecord]) -> Result<(), LedgerError>;
}

fn decode(raw: &str) -> Result<Vec<ScoreRecord>, LedgerError> {
    let mut doc: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(raw).map_err(|e| LedgerError::Malformed(e.to_string()))?;
    match doc.remove(STORAGE_KEY) {
        Some(value) => {
            serde_json::from_value(value).map_err(|e| LedgerError::Malformed(e.to_string()))
        }
        None => Ok(Vec::new()),
    }
}

fn encode(records: &[ScoreRecord]) -> Result<String, LedgerError> {
    let mut doc = serde_json::Map::new();
    doc.insert(STORAGE_KEY.to_string(), serde_json::to_value(records)?);
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Ledger persisted as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileLedger {
    path: PathBuf,
}

impl JsonFileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreLedger for JsonFileLedger {
    fn read(&self) -> Result<Option<Vec<ScoreRecord>>, LedgerError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        decode(&raw).map(Some)
    }

    fn write(&mut self, records: &[ScoreRecord]) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, encode(records)?)?;
        Ok(())
    }
}

/// In-memory ledger holding the same document a file would.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    raw: Option<String>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary stored document, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl ScoreLedger for MemoryLedger {
    fn read(&self) -> Result<Option<Vec<ScoreRecord>>, LedgerError> {
        self.raw.as_deref().map(decode).transpose()
    }

    fn write(&mut self, records: &[ScoreRecord]) -> Result<(), LedgerError> {
        self.raw = Some(encode(records)?);
        Ok(())
    }
}

/// Add `record` in front of `existing`, order by score and keep the best ten.
///
/// The sort is stable, so a new record ranks above older ones with the same
/// score.
pub fn insert_record(existing: Vec<ScoreRecord>, record: ScoreRecord) -> Vec<ScoreRecord> {
    let mut records = Vec::with_capacity(existing.len() + 1);
    records.push(record);
    records.extend(existing);
    records.sort_by(|a, b| b.score.cmp(&a.score));
    records.truncate(LEDGER_CAPACITY);
    records
}

/// Highest score stored for `mode`, 0 when there is none.
pub fn best_for_mode(records: &[ScoreRecord], mode: GameMode) -> u32 {
    records
        .iter()
        .filter(|r| r.mode == mode)
        .map(|r| r.score)
        .max()
        .unwrap_or(0)
}

/// First five stored records for `mode`, in ledger order.
pub fn recent_for_mode(records: &[ScoreRecord], mode: GameMode) -> Vec<ScoreRecord> {
    records
        .iter()
        .filter(|r| r.mode == mode)
        .take(RECENT_PER_MODE)
        .copied()
        .collect()
}

/// Per-mode view over a ledger: best score, listing, and saving on reset.
pub struct ScoreTracker<L: ScoreLedger> {
    ledger: L,
    mode: GameMode,
    records: Vec<ScoreRecord>,
    best: u32,
}

impl<L: ScoreLedger> ScoreTracker<L> {
    /// Read the ledger once. An unreadable document counts as empty.
    pub fn mount(ledger: L, mode: GameMode) -> Self {
        let mut tracker = Self {
            ledger,
            mode,
            records: Vec::new(),
            best: 0,
        };
        tracker.records = tracker.load();
        tracker.best = best_for_mode(&tracker.records, mode);
        tracker
    }

    fn load(&self) -> Vec<ScoreRecord> {
        match self.ledger.read() {
            Ok(records) => records.unwrap_or_default(),
            Err(e) => {
                warn!("ignoring unreadable score ledger: {e}");
                Vec::new()
            }
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Switch boards; the best score is recomputed from stored records.
    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.best = best_for_mode(&self.records, mode);
    }

    pub fn best_score(&self) -> u32 {
        self.best
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn recent(&self) -> Vec<ScoreRecord> {
        recent_for_mode(&self.records, self.mode)
    }

    /// A live score above the stored best becomes the best.
    pub fn observe(&mut self, current_score: u32) {
        self.best = self.best.max(current_score);
    }

    /// Save `current_score` when the game is reset. Zero is never stored.
    ///
    /// Returns whether a record was written.
    pub fn on_reset(&mut self, current_score: u32) -> Result<bool, LedgerError> {
        self.on_reset_at(current_score, Utc::now().timestamp_millis())
    }

    pub fn on_reset_at(&mut self, current_score: u32, timestamp: i64) -> Result<bool, LedgerError> {
        if current_score == 0 {
            debug!(mode = %self.mode, "nothing to save");
            return Ok(false);
        }

        let record = ScoreRecord {
            score: current_score,
            mode: self.mode,
            timestamp,
        };
        let updated = insert_record(self.load(), record);
        self.ledger.write(&updated)?;
        self.records = updated;
        self.observe(current_score);
        debug!(mode = %self.mode, score = current_score, "score saved");
        Ok(true)
    }

    pub fn into_inner(self) -> L {
        self.ledger
    }
}
