//! Headless play: a scripted participant answers every trial of a runner on
//! the virtual clock.

use cogbench_core::error::GuardError;
use cogbench_core::model::{Color, GameKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::game::Game;
use crate::games::{
    PhonicsGame, RecallGame, RecallTrial, StroopGame, StroopTrial, TimedRecallGame, WordEntry,
};
use crate::runner::{InputOutcome, Phase, TrialRunner};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("game refused to start: {0}")]
    Refused(#[from] GuardError),

    #[error("{game} stalled on trial {trial}")]
    Stalled { game: GameKind, trial: u32 },
}

/// A simulated player: answers correctly with probability `accuracy`,
/// always after `response_ms` of thinking.
#[derive(Debug, Clone)]
pub struct Participant {
    accuracy: f64,
    response_ms: u64,
    rng: StdRng,
}

impl Participant {
    pub fn new(accuracy: f64, response_ms: u64, seed: u64) -> Self {
        Self {
            accuracy: accuracy.clamp(0.0, 1.0),
            response_ms,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn response_ms(&self) -> u64 {
        self.response_ms
    }

    fn decide(&mut self) -> bool {
        self.rng.gen_bool(self.accuracy)
    }
}

/// Games that know how to produce a right or a wrong answer for a trial.
pub trait ScriptedAnswer: Game {
    fn scripted_answer(&self, trial: &Self::Trial, correct: bool) -> Vec<Self::Response>;
}

fn recall_answer(trial: &RecallTrial, correct: bool) -> Vec<usize> {
    if correct {
        return trial.sequence.clone();
    }
    let first = trial.sequence.first().copied().unwrap_or(0);
    vec![(first + 1) % trial.grid.cells()]
}

impl ScriptedAnswer for RecallGame {
    fn scripted_answer(&self, trial: &RecallTrial, correct: bool) -> Vec<usize> {
        recall_answer(trial, correct)
    }
}

impl ScriptedAnswer for TimedRecallGame {
    fn scripted_answer(&self, trial: &RecallTrial, correct: bool) -> Vec<usize> {
        recall_answer(trial, correct)
    }
}

impl ScriptedAnswer for StroopGame {
    fn scripted_answer(&self, trial: &StroopTrial, correct: bool) -> Vec<Color> {
        if correct {
            return vec![trial.ink];
        }
        if !trial.congruent {
            // reading the word instead of naming the ink
            return vec![trial.word];
        }
        let next = Color::ALL
            .iter()
            .position(|c| *c == trial.ink)
            .map(|i| Color::ALL[(i + 1) % Color::ALL.len()])
            .unwrap_or(Color::ALL[0]);
        vec![next]
    }
}

impl ScriptedAnswer for PhonicsGame {
    fn scripted_answer(&self, trial: &WordEntry, correct: bool) -> Vec<String> {
        if correct {
            return vec![trial.word.to_string()];
        }
        let mut attempt = trial.word.to_string();
        attempt.pop();
        vec![attempt]
    }
}

/// What one simulated game produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameOutcome {
    pub kind: GameKind,
    pub final_score: u32,
    pub correct: u32,
    pub trials: u32,
    /// Virtual time from start to completion.
    pub elapsed_ms: u64,
}

/// Start `runner` and play it to completion with `participant`.
pub fn play<G: ScriptedAnswer>(
    runner: &mut TrialRunner<G>,
    age: u32,
    participant: &mut Participant,
) -> Result<GameOutcome, SimulationError> {
    runner.start(Some(age))?;
    let started = runner.now();
    let stalled = |runner: &TrialRunner<G>| SimulationError::Stalled {
        game: runner.kind(),
        trial: runner.trial_number(),
    };

    loop {
        match runner.phase() {
            Phase::Complete => break,
            Phase::Idle => return Err(stalled(runner)),
            Phase::Presenting | Phase::Scoring => {
                if !runner.advance_to_next() {
                    return Err(stalled(runner));
                }
            }
            Phase::AwaitingResponse => {
                if runner.game().requires_speech() {
                    if let Err(e) = runner.speak_prompt() {
                        warn!(game = %runner.kind(), "prompt not played: {e}");
                    }
                }
                let trial = runner
                    .current_trial()
                    .cloned()
                    .ok_or_else(|| stalled(runner))?;
                let correct = participant.decide();
                let answer = runner.game().scripted_answer(&trial, correct);
                debug!(game = %runner.kind(), trial = runner.trial_number(), correct, "answering");

                runner.advance_by(participant.response_ms);
                for unit in answer {
                    while runner.is_input_locked() && runner.phase() == Phase::AwaitingResponse {
                        if !runner.advance_to_next() {
                            break;
                        }
                    }
                    if matches!(
                        runner.respond(unit),
                        InputOutcome::Success | InputOutcome::Failure
                    ) {
                        break;
                    }
                }
                if runner.phase() == Phase::AwaitingResponse {
                    return Err(stalled(runner));
                }
            }
        }
    }

    Ok(GameOutcome {
        kind: runner.kind(),
        final_score: runner.final_score().unwrap_or_default(),
        correct: runner.correct_count(),
        trials: runner.trial_number(),
        elapsed_ms: runner.now() - started,
    })
}
