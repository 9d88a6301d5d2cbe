//! Classification of finished sub-scores through a remote `Classifier`.
//!
//! One call per non-zero sub-score, issued concurrently. A failed call only
//! marks its own skill as `Error`.

use std::fmt;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::AssessmentError;
use crate::model::{GameScores, Skill};
use crate::scoring::round_half_up;
use crate::traits::{Classifier, PredictionRequest};

/// Upper bound of the inverted attention scale the classifier expects.
const ATTENTION_WIRE_MAX: f64 = 35.0;

const FIVE_LEVELS: [&str; 5] = ["Very Low", "Low", "Below Average", "Average", "Above Average"];

const CONCERN_LEVELS: [&str; 4] = [
    "Significant Concern",
    "Likely Concern",
    "Potential Concern",
    "Minimal Concern",
];

/// Score as sent on the wire. Attention is inverted onto 0-35.
pub fn wire_score(skill: Skill, score: u32) -> u32 {
    match skill {
        Skill::Attention => {
            let scaled = ATTENTION_WIRE_MAX - score as f64 / 100.0 * ATTENTION_WIRE_MAX;
            round_half_up(scaled).max(0.0) as u32
        }
        _ => score,
    }
}

/// Label for a predicted level index, `"Unknown"` outside the table.
pub fn level_label(skill: Skill, predicted: i64) -> &'static str {
    let table: &[&'static str] = match skill {
        Skill::Attention => &CONCERN_LEVELS,
        _ => &FIVE_LEVELS,
    };
    usize::try_from(predicted)
        .ok()
        .and_then(|idx| table.get(idx).copied())
        .unwrap_or("Unknown")
}

/// Result of classifying one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationOutcome {
    Level(String),
    Error,
}

impl fmt::Display for ClassificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationOutcome::Level(label) => f.write_str(label),
            ClassificationOutcome::Error => f.write_str("Error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillClassification {
    pub skill: Skill,
    pub score: u32,
    pub outcome: ClassificationOutcome,
}

/// Per-skill results in game order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub results: Vec<SkillClassification>,
}

impl ClassificationReport {
    /// `"Working Memory: Average | Attention: Minimal Concern"` style line.
    pub fn summary(&self) -> String {
        if self.results.is_empty() {
            return "No assessments completed".to_string();
        }
        self.results
            .iter()
            .map(|r| format!("{}: {}", r.skill, r.outcome))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn get(&self, skill: Skill) -> Option<&SkillClassification> {
        self.results.iter().find(|r| r.skill == skill)
    }

    pub fn has_errors(&self) -> bool {
        self.results
            .iter()
            .any(|r| r.outcome == ClassificationOutcome::Error)
    }
}

/// Classify every non-zero sub-score.
///
/// Fails only when there is nothing to ask: no age, or every score is zero.
pub async fn classify_scores(
    classifier: &dyn Classifier,
    age: u32,
    scores: &GameScores,
) -> Result<ClassificationReport, AssessmentError> {
    if age == 0 || !scores.any_populated() {
        return Err(AssessmentError::NothingToClassify);
    }

    let pending: Vec<(Skill, u32)> = scores.iter().filter(|(_, score)| *score > 0).collect();
    debug!(
        classifier = classifier.name(),
        calls = pending.len(),
        "requesting classification"
    );

    let calls = pending.iter().map(|&(skill, score)| async move {
        let request = PredictionRequest {
            skill,
            age,
            score: wire_score(skill, score),
        };
        let outcome = match classifier.predict(&request).await {
            Ok(prediction) => {
                ClassificationOutcome::Level(level_label(skill, prediction.predicted).to_string())
            }
            Err(e) => {
                error!(skill = %skill, "classification failed: {e:#}");
                ClassificationOutcome::Error
            }
        };
        SkillClassification {
            skill,
            score,
            outcome,
        }
    });

    let results = join_all(calls).await;
    let report = ClassificationReport { results };
    info!(summary = %report.summary(), "classification complete");
    Ok(report)
}
