//! Auditory-processing scorer for the phonics spelling game.

use serde::{Deserialize, Serialize};

use crate::model::SpellingSession;
use crate::scoring::{finalize_score, round_half_up, Interpretation, Scorer, SessionLog};
use crate::similarity;

pub const DEFAULT_MAX_TRIALS: u32 = 5;

/// Bonus points per session at a phoneme accuracy of 1.0.
const PHONEME_BONUS_WEIGHT: f64 = 5.0;
/// Mean response time under which the speed bonus applies.
const FAST_RESPONSE_MS: f64 = 10_000.0;
const MAX_SPEED_BONUS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AuditoryProcessingScorer {
    log: SessionLog<SpellingSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditoryAnalysis {
    pub total_sessions: usize,
    pub perfect_spellings: usize,
    /// Whole percent of sessions flagged correct.
    pub spelling_accuracy: u32,
    /// Mean stored phoneme accuracy as a whole percent.
    pub phoneme_accuracy: u32,
    /// Rounded milliseconds.
    pub average_response_time_ms: u64,
    pub score: u32,
    pub interpretation: Interpretation,
}

impl AuditoryProcessingScorer {
    pub fn new(max_trials: u32) -> Self {
        Self {
            log: SessionLog::new(max_trials),
        }
    }

    pub fn spelling_accuracy(&self) -> u32 {
        if self.log.is_empty() {
            return 0;
        }
        let correct = self.log.count(|s| s.is_correct);
        round_half_up(correct as f64 / self.log.len() as f64 * 100.0) as u32
    }

    pub fn mean_phoneme_accuracy(&self) -> u32 {
        self.log
            .mean(|s| s.phoneme_accuracy)
            .map(|mean| round_half_up(mean * 100.0).max(0.0) as u32)
            .unwrap_or(0)
    }

    pub fn average_response_time_ms(&self) -> u64 {
        self.log
            .mean(|s| s.response_time_ms as f64)
            .map(|mean| round_half_up(mean) as u64)
            .unwrap_or(0)
    }

    fn trial_points(&self, session: &SpellingSession) -> f64 {
        let per_trial = self.log.points_per_trial();
        // The flag decides full credit; otherwise credit is recomputed from
        // the strings, so a matching spelling flagged wrong still earns 1.0.
        let spelling = if session.is_correct {
            per_trial
        } else {
            per_trial * similarity::partial_credit(&session.word, &session.user_spelling)
        };
        spelling + session.phoneme_accuracy * PHONEME_BONUS_WEIGHT
    }

    fn speed_bonus(&self) -> f64 {
        match self.log.mean(|s| s.response_time_ms as f64) {
            Some(mean) if mean < FAST_RESPONSE_MS => {
                ((FAST_RESPONSE_MS - mean) / 1000.0).min(MAX_SPEED_BONUS)
            }
            _ => 0.0,
        }
    }
}

impl Default for AuditoryProcessingScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRIALS)
    }
}

impl Scorer for AuditoryProcessingScorer {
    type Session = SpellingSession;
    type Analysis = AuditoryAnalysis;

    fn add_session(&mut self, session: SpellingSession) {
        self.log.push(session);
    }

    fn score(&self) -> u32 {
        if self.log.is_empty() {
            return 0;
        }
        let trials: f64 = self
            .log
            .as_slice()
            .iter()
            .map(|s| self.trial_points(s))
            .sum();
        finalize_score(trials + self.speed_bonus())
    }

    fn analysis(&self) -> AuditoryAnalysis {
        let score = self.score();
        AuditoryAnalysis {
            total_sessions: self.log.len(),
            perfect_spellings: self.log.count(|s| s.is_correct),
            spelling_accuracy: self.spelling_accuracy(),
            phoneme_accuracy: self.mean_phoneme_accuracy(),
            average_response_time_ms: self.average_response_time_ms(),
            score,
            interpretation: Interpretation::from_score(score),
        }
    }

    fn sessions(&self) -> &[SpellingSession] {
        self.log.as_slice()
    }

    fn set_max_trials(&mut self, max_trials: u32) {
        self.log.set_max_trials(max_trials);
    }

    fn reset(&mut self) {
        self.log.clear();
    }
}
