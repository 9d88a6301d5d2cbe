//! cogbench-report: score ledger and assessment summaries.

pub mod ledger;
pub mod summary;

pub use ledger::{
    GameMode, JsonFileLedger, LedgerError, MemoryLedger, ScoreLedger, ScoreRecord, ScoreTracker,
};
pub use summary::{AssessmentSummary, GameResult};
