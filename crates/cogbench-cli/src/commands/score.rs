//! The `cogbench score` command: re-score recorded sessions offline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use cogbench_core::scoring::{Interpretation, Scorer};
use cogbench_core::{
    AttentionScorer, AuditoryProcessingScorer, ProcessingSpeedScorer, WorkingMemoryScorer,
};

#[derive(Serialize)]
struct ScoreOutput<A> {
    game: String,
    sessions: usize,
    score: u32,
    interpretation: Interpretation,
    analysis: A,
}

pub fn execute(game: String, sessions: PathBuf, max_trials: u32, format: String) -> Result<()> {
    if max_trials == 0 {
        anyhow::bail!("max-trials must be at least 1");
    }

    match game.as_str() {
        "recall" | "working-memory" => report(
            &game,
            WorkingMemoryScorer::new(max_trials),
            &sessions,
            &format,
        ),
        "timed" | "processing-speed" => report(
            &game,
            ProcessingSpeedScorer::new(max_trials),
            &sessions,
            &format,
        ),
        "stroop" | "attention" => {
            report(&game, AttentionScorer::new(max_trials), &sessions, &format)
        }
        "phonics" | "auditory" => report(
            &game,
            AuditoryProcessingScorer::new(max_trials),
            &sessions,
            &format,
        ),
        other => anyhow::bail!("unknown game: {other} (expected recall, timed, stroop or phonics)"),
    }
}

fn load_sessions<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read sessions from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse sessions in {}", path.display()))
}

fn report<S>(game: &str, mut scorer: S, path: &Path, format: &str) -> Result<()>
where
    S: Scorer,
    S::Session: DeserializeOwned,
    S::Analysis: Serialize,
{
    let sessions: Vec<S::Session> = load_sessions(path)?;
    let count = sessions.len();
    for session in sessions {
        scorer.add_session(session);
    }

    let score = scorer.score();
    let output = ScoreOutput {
        game: game.to_string(),
        sessions: count,
        score,
        interpretation: Interpretation::from_score(score),
        analysis: scorer.analysis(),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&output)?),
        "text" => {
            println!("Game:           {}", output.game);
            println!("Sessions:       {}", output.sessions);
            println!("Score:          {}", output.score);
            println!("Interpretation: {}", output.interpretation);
            let analysis = serde_json::to_value(&output.analysis)?;
            if let Some(fields) = analysis.as_object() {
                println!();
                for (key, value) in fields {
                    println!("  {key}: {value}");
                }
            }
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }
    Ok(())
}
