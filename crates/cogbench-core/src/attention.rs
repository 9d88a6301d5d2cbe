//! Attention scorer for the Stroop color/word interference game.
//!
//! Base points come from correct answers. Good accuracy on incongruent trials
//! (word and ink disagree) earns a small bonus, and a slow mean response time
//! costs up to ten points.

use serde::{Deserialize, Serialize};

use crate::model::AttentionSession;
use crate::scoring::{finalize_score, percent, round_half_up, Interpretation, Scorer, SessionLog};

pub const DEFAULT_MAX_TRIALS: u32 = 5;

/// Mean response time above which the speed penalty kicks in.
const SLOW_RESPONSE_MS: f64 = 3000.0;
const MAX_SPEED_PENALTY: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AttentionScorer {
    log: SessionLog<AttentionSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionAnalysis {
    pub total_sessions: usize,
    pub correct_sessions: usize,
    /// Overall accuracy, one decimal.
    pub accuracy: f64,
    /// Whole percent.
    pub congruent_accuracy: u32,
    /// Whole percent.
    pub incongruent_accuracy: u32,
    /// How much worse incongruent trials went, never negative.
    pub stroop_interference: u32,
    pub score: u32,
    pub interpretation: Interpretation,
}

impl AttentionScorer {
    pub fn new(max_trials: u32) -> Self {
        Self {
            log: SessionLog::new(max_trials),
        }
    }

    pub fn congruent_accuracy(&self) -> u32 {
        self.accuracy_where(true)
    }

    pub fn incongruent_accuracy(&self) -> u32 {
        self.accuracy_where(false)
    }

    pub fn stroop_interference(&self) -> u32 {
        self.congruent_accuracy()
            .saturating_sub(self.incongruent_accuracy())
    }

    fn accuracy_where(&self, congruent: bool) -> u32 {
        let total = self.log.count(|s| s.is_congruent == congruent);
        if total == 0 {
            return 0;
        }
        let correct = self.log.count(|s| s.is_congruent == congruent && s.is_correct);
        round_half_up(correct as f64 / total as f64 * 100.0) as u32
    }

    fn incongruent_bonus(&self) -> f64 {
        let incongruent = self.log.count(|s| !s.is_congruent);
        if incongruent == 0 {
            return 0.0;
        }
        let correct = self.log.count(|s| !s.is_congruent && s.is_correct);
        let accuracy = correct as f64 / incongruent as f64;
        ((accuracy - 0.5) * 10.0).max(0.0)
    }

    fn speed_penalty(&self) -> f64 {
        match self.log.mean(|s| s.response_time_ms as f64) {
            Some(mean) if mean > SLOW_RESPONSE_MS => {
                ((mean - SLOW_RESPONSE_MS) / 500.0).min(MAX_SPEED_PENALTY)
            }
            _ => 0.0,
        }
    }
}

impl Default for AttentionScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRIALS)
    }
}

impl Scorer for AttentionScorer {
    type Session = AttentionSession;
    type Analysis = AttentionAnalysis;

    fn add_session(&mut self, session: AttentionSession) {
        self.log.push(session);
    }

    fn score(&self) -> u32 {
        if self.log.is_empty() {
            return 0;
        }
        let correct = self.log.count(|s| s.is_correct);
        let base = correct as f64 * self.log.points_per_trial();
        finalize_score(base + self.incongruent_bonus() - self.speed_penalty())
    }

    fn analysis(&self) -> AttentionAnalysis {
        let score = self.score();
        let correct = self.log.count(|s| s.is_correct);
        AttentionAnalysis {
            total_sessions: self.log.len(),
            correct_sessions: correct,
            accuracy: percent(correct, self.log.len()),
            congruent_accuracy: self.congruent_accuracy(),
            incongruent_accuracy: self.incongruent_accuracy(),
            stroop_interference: self.stroop_interference(),
            score,
            interpretation: Interpretation::from_score(score),
        }
    }

    fn sessions(&self) -> &[AttentionSession] {
        self.log.as_slice()
    }

    fn set_max_trials(&mut self, max_trials: u32) {
        self.log.set_max_trials(max_trials);
    }

    fn reset(&mut self) {
        self.log.clear();
    }
}
