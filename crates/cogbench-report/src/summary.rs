//! Assessment summary with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cogbench_core::classification::ClassificationReport;
use cogbench_core::model::{GameKind, GameScores, Skill};
use cogbench_core::scoring::Interpretation;

/// Outcome of one finished game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub kind: GameKind,
    pub skill: Skill,
    /// Final 0-100 sub-score.
    pub score: u32,
    /// Raw count of successful trials.
    pub correct: u32,
    pub trials: u32,
    pub interpretation: Interpretation,
    /// Scorer-specific breakdown.
    #[serde(default)]
    pub analysis: serde_json::Value,
}

/// Everything one assessment pass produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub age: Option<u32>,
    pub games: Vec<GameResult>,
    #[serde(default)]
    pub classification: Option<ClassificationReport>,
}

impl AssessmentSummary {
    pub fn new(age: Option<u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            age,
            games: Vec::new(),
            classification: None,
        }
    }

    pub fn push_game(&mut self, result: GameResult) {
        self.games.push(result);
    }

    /// Sub-scores of the games played so far.
    pub fn scores(&self) -> GameScores {
        let mut scores = GameScores::default();
        for game in &self.games {
            scores.set(game.skill, game.score);
        }
        scores
    }

    /// Save the summary as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize summary")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        Ok(())
    }

    /// Load a summary from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read summary from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse summary JSON")
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("## Assessment summary\n\n");
        let age = self
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| "not entered".to_string());
        md.push_str(&format!(
            "**Age:** {} | **Date:** {}\n\n",
            age,
            self.created_at.format("%Y-%m-%d %H:%M UTC")
        ));

        if self.games.is_empty() {
            md.push_str("No games played.\n");
            return md;
        }

        md.push_str("| Skill | Game | Score | Correct | Interpretation |\n");
        md.push_str("|-------|------|-------|---------|----------------|\n");
        for g in &self.games {
            md.push_str(&format!(
                "| {} | {} | {} | {}/{} | {} |\n",
                g.skill, g.kind, g.score, g.correct, g.trials, g.interpretation
            ));
        }
        md.push('\n');

        if let Some(report) = &self.classification {
            md.push_str("### Classification\n\n");
            md.push_str(&report.summary());
            md.push('\n');
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogbench_core::classification::{ClassificationOutcome, SkillClassification};

    fn game(kind: GameKind, score: u32, correct: u32) -> GameResult {
        GameResult {
            kind,
            skill: kind.skill(),
            score,
            correct,
            trials: 5,
            interpretation: Interpretation::from_score(score),
            analysis: serde_json::Value::Null,
        }
    }

    fn sample() -> AssessmentSummary {
        let mut summary = AssessmentSummary::new(Some(8));
        summary.push_game(game(GameKind::SequenceRecall, 100, 5));
        summary.push_game(game(GameKind::Stroop, 60, 3));
        summary
    }

    #[test]
    fn scores_follow_games() {
        let scores = sample().scores();
        assert_eq!(scores.get(Skill::WorkingMemory), 100);
        assert_eq!(scores.get(Skill::Attention), 60);
        assert_eq!(scores.get(Skill::ProcessingSpeed), 0);
    }

    #[test]
    fn markdown_lists_games_and_classification() {
        let mut summary = sample();
        summary.classification = Some(ClassificationReport {
            results: vec![SkillClassification {
                skill: Skill::Attention,
                score: 60,
                outcome: ClassificationOutcome::Level("Minimal Concern".into()),
            }],
        });

        let md = summary.to_markdown();
        assert!(md.contains("**Age:** 8"));
        assert!(md.contains("| Working Memory |"));
        assert!(md.contains("| 60 | 3/5 | Average |"));
        assert!(md.contains("Attention: Minimal Concern"));
    }

    #[test]
    fn empty_summary_says_so() {
        let md = AssessmentSummary::new(None).to_markdown();
        assert!(md.contains("not entered"));
        assert!(md.contains("No games played."));
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("summary.json");
        let summary = sample();
        summary.save_json(&path).unwrap();

        let loaded = AssessmentSummary::load_json(&path).unwrap();
        assert_eq!(loaded.id, summary.id);
        assert_eq!(loaded.games.len(), 2);
        assert_eq!(loaded.games[1].interpretation, Interpretation::Average);
    }
}
