//! The `cogbench ledger` command.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::DateTime;
use comfy_table::{Cell, Table};

use cogbench_providers::config::load_config_from;
use cogbench_report::{GameMode, JsonFileLedger, ScoreRecord, ScoreTracker};

use crate::LedgerAction;

pub fn execute(
    action: LedgerAction,
    path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let ledger_path = match path {
        Some(p) => p,
        None => load_config_from(config_path.as_deref())?.ledger_path,
    };
    let ledger = JsonFileLedger::new(&ledger_path);

    match action {
        LedgerAction::Show { mode: None } => {
            // the board only matters for best/recent, not the full listing
            let tracker = ScoreTracker::mount(ledger, GameMode::Grid3);
            if tracker.records().is_empty() {
                println!("No scores saved in {}", ledger_path.display());
                return Ok(());
            }
            println!("{}", records_table(tracker.records()));
        }
        LedgerAction::Show { mode: Some(mode) } => {
            let mode = parse_mode(&mode)?;
            let tracker = ScoreTracker::mount(ledger, mode);
            println!("Best ({mode}): {}", tracker.best_score());
            let recent = tracker.recent();
            if recent.is_empty() {
                println!("No {mode} scores saved yet.");
            } else {
                println!("{}", records_table(&recent));
            }
        }
        LedgerAction::Add { mode, score } => {
            let mode = parse_mode(&mode)?;
            let mut tracker = ScoreTracker::mount(ledger, mode);
            let saved = tracker
                .on_reset(score)
                .with_context(|| format!("failed to update {}", ledger_path.display()))?;
            if saved {
                println!("Saved {score} to {mode} (best {})", tracker.best_score());
            } else {
                println!("A score of zero is not saved.");
            }
        }
    }

    Ok(())
}

fn parse_mode(raw: &str) -> Result<GameMode> {
    raw.parse::<GameMode>().map_err(|e| anyhow!(e))
}

fn records_table(records: &[ScoreRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Mode", "Score", "Saved"]);
    for (i, record) in records.iter().enumerate() {
        let saved = DateTime::from_timestamp_millis(record.timestamp)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| record.timestamp.to_string());
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(record.mode),
            Cell::new(record.score),
            Cell::new(saved),
        ]);
    }
    table
}
