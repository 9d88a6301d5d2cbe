//! Working-memory scorer, fed by the untimed sequence-recall game.

use serde::{Deserialize, Serialize};

use crate::model::RecallSession;
use crate::scoring::{finalize_score, percent, Interpretation, Scorer, SessionLog};

/// Default trial count when none is configured.
pub const DEFAULT_MAX_TRIALS: u32 = 15;

/// Equal-weight scorer: every successful trial earns `100 / max_trials`.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingMemoryScorer {
    log: SessionLog<RecallSession>,
}

/// Sub-metrics for a working-memory run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingMemoryAnalysis {
    pub total_sessions: usize,
    pub successful_sessions: usize,
    /// Percentage, one decimal.
    pub success_rate: f64,
    pub score: u32,
    pub interpretation: Interpretation,
}

impl WorkingMemoryScorer {
    pub fn new(max_trials: u32) -> Self {
        Self {
            log: SessionLog::new(max_trials),
        }
    }

    pub fn successful_sessions(&self) -> usize {
        self.log.count(|s| s.success)
    }
}

impl Default for WorkingMemoryScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRIALS)
    }
}

impl Scorer for WorkingMemoryScorer {
    type Session = RecallSession;
    type Analysis = WorkingMemoryAnalysis;

    fn add_session(&mut self, session: RecallSession) {
        self.log.push(session);
    }

    fn score(&self) -> u32 {
        if self.log.is_empty() {
            return 0;
        }
        let total = self.successful_sessions() as f64 * self.log.points_per_trial();
        finalize_score(total)
    }

    fn analysis(&self) -> WorkingMemoryAnalysis {
        let score = self.score();
        let successful = self.successful_sessions();
        WorkingMemoryAnalysis {
            total_sessions: self.log.len(),
            successful_sessions: successful,
            success_rate: percent(successful, self.log.len()),
            score,
            interpretation: Interpretation::from_score(score),
        }
    }

    fn sessions(&self) -> &[RecallSession] {
        self.log.as_slice()
    }

    fn set_max_trials(&mut self, max_trials: u32) {
        self.log.set_max_trials(max_trials);
    }

    fn reset(&mut self) {
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GridSize;

    fn session(trial: u32, success: bool) -> RecallSession {
        RecallSession {
            trial_number: trial,
            grid_size: GridSize::Three,
            sequence_length: trial as usize,
            success,
            attempts: 1,
            total_rounds: trial,
            response_time_ms: 1500,
        }
    }

    #[test]
    fn empty_scores_zero() {
        let scorer = WorkingMemoryScorer::new(5);
        assert_eq!(scorer.score(), 0);
        assert_eq!(scorer.analysis().success_rate, 0.0);
    }

    #[test]
    fn five_successes_out_of_five_is_perfect() {
        let mut scorer = WorkingMemoryScorer::new(5);
        for t in 1..=5 {
            scorer.add_session(session(t, true));
        }
        assert_eq!(scorer.score(), 100);
        assert_eq!(scorer.analysis().interpretation, Interpretation::Exceptional);
    }

    #[test]
    fn default_denominator_is_fifteen() {
        let mut scorer = WorkingMemoryScorer::default();
        for t in 1..=5 {
            scorer.add_session(session(t, true));
        }
        // 5 * 6.666.. = 33.33
        assert_eq!(scorer.score(), 33);
    }

    #[test]
    fn failures_add_nothing() {
        let mut scorer = WorkingMemoryScorer::new(5);
        scorer.add_session(session(1, true));
        scorer.add_session(session(2, false));
        scorer.add_session(session(3, true));
        assert_eq!(scorer.score(), 40);

        let analysis = scorer.analysis();
        assert_eq!(analysis.total_sessions, 3);
        assert_eq!(analysis.successful_sessions, 2);
        assert_eq!(analysis.success_rate, 66.7);
        assert_eq!(analysis.interpretation, Interpretation::Low);
    }

    #[test]
    fn more_sessions_than_trials_still_clamps() {
        let mut scorer = WorkingMemoryScorer::new(5);
        for t in 1..=8 {
            scorer.add_session(session(t, true));
        }
        assert_eq!(scorer.score(), 100);
    }

    #[test]
    fn score_is_repeatable_and_reset_clears() {
        let mut scorer = WorkingMemoryScorer::new(5);
        scorer.add_session(session(1, true));
        assert_eq!(scorer.score(), scorer.score());
        scorer.reset();
        assert!(scorer.sessions().is_empty());
        assert_eq!(scorer.score(), 0);
    }
}
