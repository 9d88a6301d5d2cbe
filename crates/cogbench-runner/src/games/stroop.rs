//! Stroop color/word interference game (attention).
//!
//! A color word is shown in some ink; the participant picks the ink.

use cogbench_core::model::{AttentionSession, Color, GameKind};
use cogbench_core::AttentionScorer;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;

use crate::game::{Game, Judgement, TrialContext};

/// Probability that ink and word agree.
pub const CONGRUENT_PROBABILITY: f64 = 0.4;

pub const DEFAULT_SETTLE_MS: u64 = 1200;

/// One word/ink pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StroopTrial {
    pub word: Color,
    pub ink: Color,
    pub congruent: bool,
}

/// Draw a trial: uniform word, congruent with probability 0.4, otherwise a
/// uniform ink among the other four colors.
pub fn draw_trial<R: Rng + ?Sized>(rng: &mut R) -> StroopTrial {
    let word = Color::ALL[rng.gen_range(0..Color::ALL.len())];
    let congruent = rng.gen_bool(CONGRUENT_PROBABILITY);
    let ink = if congruent {
        word
    } else {
        let others: Vec<Color> = Color::ALL.into_iter().filter(|c| *c != word).collect();
        others[rng.gen_range(0..others.len())]
    };
    StroopTrial {
        word,
        ink,
        congruent,
    }
}

pub struct StroopGame {
    rng: Box<dyn RngCore + Send>,
    settle_ms: u64,
}

impl StroopGame {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Box::new(rng),
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    pub fn with_settle_ms(mut self, settle_ms: u64) -> Self {
        self.settle_ms = settle_ms;
        self
    }
}

impl Default for StroopGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for StroopGame {
    type Trial = StroopTrial;
    type Response = Color;
    type Session = AttentionSession;
    type Scorer = AttentionScorer;

    fn kind(&self) -> GameKind {
        GameKind::Stroop
    }

    fn reset(&mut self) {}

    fn next_trial(&mut self) -> StroopTrial {
        draw_trial(&mut self.rng)
    }

    fn judge(&self, trial: &StroopTrial, _position: usize, selected: &Color) -> Judgement {
        if *selected == trial.ink {
            Judgement::Success
        } else {
            Judgement::Failure
        }
    }

    fn build_session(
        &self,
        trial: &StroopTrial,
        responses: &[Color],
        success: bool,
        context: &TrialContext,
    ) -> AttentionSession {
        AttentionSession {
            trial_number: context.trial_number,
            is_congruent: trial.congruent,
            word_shown: trial.word,
            ink_color: trial.ink,
            selected_color: responses.last().copied().unwrap_or(trial.ink),
            is_correct: success,
            response_time_ms: context.response_time_ms,
        }
    }

    fn feedback(&self, trial: &StroopTrial, _responses: &[Color], success: bool) -> Option<String> {
        let message = if success {
            "Correct!".to_string()
        } else {
            format!(
                "Incorrect. The word was {} ink.",
                trial.ink.to_string().to_lowercase()
            )
        };
        Some(message)
    }

    fn settle_ms(&self) -> u64 {
        self.settle_ms
    }
}
