//! Time-boxed sequence recall (processing speed).
//!
//! Same sequence and playback as [`RecallGame`](super::recall::RecallGame);
//! once playback ends a countdown starts. Running out of time does not stop
//! the trial, it only marks the eventual answer as late.

use std::ops::RangeInclusive;

use cogbench_core::model::{GameKind, GridSize, TimedRecallSession};
use cogbench_core::ProcessingSpeedScorer;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::recall::{
    judge_click, recall_presentation, RecallTrial, SequenceGenerator, CLICK_SETTLE_MS,
    DEFAULT_SETTLE_MS,
};
use crate::game::{Game, Judgement, Presentation, TrialContext};

/// Countdown range for young participants.
pub const YOUNG_WINDOW_MS: RangeInclusive<u64> = 15_000..=30_000;
pub const STANDARD_WINDOW_MS: RangeInclusive<u64> = 5_000..=10_000;

/// Countdown range for a participant of `age` years.
pub fn allowed_time_window(age: u32) -> RangeInclusive<u64> {
    if (5..=7).contains(&age) {
        YOUNG_WINDOW_MS
    } else {
        STANDARD_WINDOW_MS
    }
}

pub struct TimedRecallGame {
    generator: SequenceGenerator,
    timer_rng: Box<dyn RngCore + Send>,
    settle_ms: u64,
}

impl TimedRecallGame {
    pub fn new(grid: GridSize) -> Self {
        Self::with_parts(SequenceGenerator::new(grid), StdRng::from_entropy())
    }

    /// Fully deterministic game for replays and tests.
    pub fn seeded(grid: GridSize, seed: u64) -> Self {
        Self::with_parts(
            SequenceGenerator::with_rng(grid, StdRng::seed_from_u64(seed)),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        )
    }

    pub fn with_parts(generator: SequenceGenerator, timer_rng: impl RngCore + Send + 'static) -> Self {
        Self {
            generator,
            timer_rng: Box::new(timer_rng),
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    pub fn with_settle_ms(mut self, settle_ms: u64) -> Self {
        self.settle_ms = settle_ms;
        self
    }
}

impl Game for TimedRecallGame {
    type Trial = RecallTrial;
    type Response = usize;
    type Session = TimedRecallSession;
    type Scorer = ProcessingSpeedScorer;

    fn kind(&self) -> GameKind {
        GameKind::TimedRecall
    }

    fn reset(&mut self) {
        self.generator.reset();
    }

    fn next_trial(&mut self) -> RecallTrial {
        let sequence = self.generator.extend().to_vec();
        RecallTrial {
            grid: self.generator.grid(),
            sequence,
        }
    }

    fn presentation(&self, trial: &RecallTrial) -> Presentation {
        recall_presentation(&trial.sequence)
    }

    fn judge(&self, trial: &RecallTrial, position: usize, cell: &usize) -> Judgement {
        judge_click(&trial.sequence, position, *cell)
    }

    fn build_session(
        &self,
        trial: &RecallTrial,
        _responses: &[usize],
        success: bool,
        context: &TrialContext,
    ) -> TimedRecallSession {
        TimedRecallSession {
            trial_number: context.trial_number,
            grid_size: trial.grid,
            sequence_length: trial.sequence.len(),
            success,
            completed_on_time: context.completed_on_time,
            attempts: 1,
            total_rounds: context.trial_number,
            response_time_ms: context.response_time_ms,
            allowed_time_ms: context.allowed_time_ms.unwrap_or_default(),
        }
    }

    fn settle_ms(&self) -> u64 {
        self.settle_ms
    }

    fn input_settle_ms(&self) -> u64 {
        CLICK_SETTLE_MS
    }

    fn time_limit_ms(&mut self, age: u32) -> Option<u64> {
        Some(self.timer_rng.gen_range(allowed_time_window(age)))
    }
}
