//! Processing-speed scorer, fed by the time-boxed recall game.

use serde::{Deserialize, Serialize};

use crate::model::TimedRecallSession;
use crate::scoring::{finalize_score, percent, Interpretation, Scorer, SessionLog};

pub const DEFAULT_MAX_TRIALS: u32 = 5;

/// Points taken off a successful trial answered after the countdown ran out.
pub const DEFAULT_TIMEOUT_PENALTY: f64 = 15.0;

/// Scores successful trials, docking late ones by a fixed penalty.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingSpeedScorer {
    log: SessionLog<TimedRecallSession>,
    timeout_penalty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingSpeedAnalysis {
    pub total_sessions: usize,
    pub successful_sessions: usize,
    pub timeout_sessions: usize,
    pub success_rate: f64,
    pub timeout_rate: f64,
    pub score: u32,
    pub interpretation: Interpretation,
}

impl ProcessingSpeedScorer {
    pub fn new(max_trials: u32) -> Self {
        Self {
            log: SessionLog::new(max_trials),
            timeout_penalty: DEFAULT_TIMEOUT_PENALTY,
        }
    }

    pub fn set_timeout_penalty(&mut self, penalty: f64) {
        self.timeout_penalty = penalty;
    }

    pub fn timeout_penalty(&self) -> f64 {
        self.timeout_penalty
    }

    /// Sessions not completed on time, successful or not.
    pub fn timeout_count(&self) -> usize {
        self.log.count(|s| !s.completed_on_time)
    }

    fn trial_points(&self, session: &TimedRecallSession) -> f64 {
        if !session.success {
            return 0.0;
        }
        let mut points = self.log.points_per_trial();
        if !session.completed_on_time {
            points -= self.timeout_penalty;
        }
        points.max(0.0)
    }
}

impl Default for ProcessingSpeedScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRIALS)
    }
}

impl Scorer for ProcessingSpeedScorer {
    type Session = TimedRecallSession;
    type Analysis = ProcessingSpeedAnalysis;

    fn add_session(&mut self, session: TimedRecallSession) {
        self.log.push(session);
    }

    fn score(&self) -> u32 {
        if self.log.is_empty() {
            return 0;
        }
        let total: f64 = self
            .log
            .as_slice()
            .iter()
            .map(|s| self.trial_points(s))
            .sum();
        finalize_score(total)
    }

    fn analysis(&self) -> ProcessingSpeedAnalysis {
        let score = self.score();
        let total = self.log.len();
        let successful = self.log.count(|s| s.success);
        let timeouts = self.timeout_count();
        ProcessingSpeedAnalysis {
            total_sessions: total,
            successful_sessions: successful,
            timeout_sessions: timeouts,
            success_rate: percent(successful, total),
            timeout_rate: percent(timeouts, total),
            score,
            interpretation: Interpretation::from_score(score),
        }
    }

    fn sessions(&self) -> &[TimedRecallSession] {
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

    fn session(trial: u32, success: bool, on_time: bool) -> TimedRecallSession {
        TimedRecallSession {
            trial_number: trial,
            grid_size: GridSize::Three,
            sequence_length: trial as usize,
            success,
            completed_on_time: on_time,
            attempts: 1,
            total_rounds: trial,
            response_time_ms: 4000,
            allowed_time_ms: 8000,
        }
    }

    #[test]
    fn all_late_successes_score_twenty_five() {
        let mut scorer = ProcessingSpeedScorer::new(5);
        for t in 1..=5 {
            scorer.add_session(session(t, true, false));
        }
        assert_eq!(scorer.score(), 25);
        assert_eq!(scorer.timeout_count(), 5);
    }

    #[test]
    fn on_time_successes_are_full_marks() {
        let mut scorer = ProcessingSpeedScorer::default();
        for t in 1..=5 {
            scorer.add_session(session(t, true, true));
        }
        assert_eq!(scorer.score(), 100);
    }

    #[test]
    fn failed_sessions_contribute_nothing_but_count_as_timeouts() {
        let mut scorer = ProcessingSpeedScorer::new(5);
        scorer.add_session(session(1, false, false));
        scorer.add_session(session(2, true, true));
        assert_eq!(scorer.score(), 20);

        let analysis = scorer.analysis();
        assert_eq!(analysis.timeout_sessions, 1);
        assert_eq!(analysis.timeout_rate, 50.0);
        assert_eq!(analysis.success_rate, 50.0);
    }

    #[test]
    fn penalty_floors_each_trial_at_zero() {
        // 15 trials -> 6.67 points each, minus 15 floors to zero
        let mut scorer = ProcessingSpeedScorer::new(15);
        scorer.add_session(session(1, true, false));
        scorer.add_session(session(2, true, true));
        assert_eq!(scorer.score(), 7);
    }

    #[test]
    fn custom_penalty() {
        let mut scorer = ProcessingSpeedScorer::new(5);
        scorer.set_timeout_penalty(5.0);
        scorer.add_session(session(1, true, false));
        assert_eq!(scorer.score(), 15);
    }
}
