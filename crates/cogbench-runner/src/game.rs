//! The `Game` trait: what a game supplies to the generic trial runner.
//!
//! The runner owns the lifecycle (timers, input lock, countdown, scoring,
//! advancing). A game owns only its stimulus: how to generate a trial, how
//! to present it, how to judge a response unit and what record to keep.

use std::fmt;

use cogbench_core::model::GameKind;
use cogbench_core::Scorer;

/// One timed step of a presentation, e.g. a grid cell lighting up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    /// Delay from the start of the presentation.
    pub offset_ms: u64,
    /// Which element the cue refers to (a grid cell index).
    pub index: usize,
    /// True when the element turns on, false when it turns off.
    pub lit: bool,
}

/// Presentation choreography of a trial.
///
/// The response window opens `total_ms` after presentation starts. A zero
/// total opens it immediately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presentation {
    pub cues: Vec<Cue>,
    pub total_ms: u64,
}

impl Presentation {
    /// No choreography: responses are accepted straight away.
    pub fn immediate() -> Self {
        Self::default()
    }
}

/// Verdict on one response unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgement {
    /// Correct so far, more units expected.
    Continue,
    /// The last expected unit matched.
    Success,
    /// Mismatch. The trial fails immediately.
    Failure,
}

/// Runner-measured facts about a resolved trial, handed to the game so it
/// can build its session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialContext {
    pub trial_number: u32,
    pub response_time_ms: u64,
    pub completed_on_time: bool,
    pub allowed_time_ms: Option<u64>,
}

/// A game the [`TrialRunner`](crate::runner::TrialRunner) can drive.
pub trait Game: Send {
    /// Immutable stimulus of one trial.
    type Trial: Clone + fmt::Debug + Send;
    /// One response unit (a clicked cell, a chosen color, a typed word).
    type Response: Clone + fmt::Debug + Send;
    type Session: Clone + fmt::Debug;
    type Scorer: Scorer<Session = Self::Session> + Default + Send;

    fn kind(&self) -> GameKind;

    /// Forget per-attempt state (growing sequence, used words).
    fn reset(&mut self);

    /// Generate the next trial.
    fn next_trial(&mut self) -> Self::Trial;

    fn presentation(&self, _trial: &Self::Trial) -> Presentation {
        Presentation::immediate()
    }

    /// Whether a unit counts as a response at all. Rejected units are
    /// dropped without touching the trial.
    fn accepts(&self, _response: &Self::Response) -> bool {
        true
    }

    /// Compare the unit at `position` against the expected value.
    fn judge(&self, trial: &Self::Trial, position: usize, response: &Self::Response) -> Judgement;

    fn build_session(
        &self,
        trial: &Self::Trial,
        responses: &[Self::Response],
        success: bool,
        context: &TrialContext,
    ) -> Self::Session;

    /// Message shown once the trial resolves.
    fn feedback(&self, _trial: &Self::Trial, _responses: &[Self::Response], _success: bool) -> Option<String> {
        None
    }

    /// Pause between a resolved trial and the next one.
    fn settle_ms(&self) -> u64;

    /// Input lock held after each accepted non-final unit.
    fn input_settle_ms(&self) -> u64 {
        0
    }

    /// Countdown length for this trial, `None` for untimed games.
    fn time_limit_ms(&mut self, _age: u32) -> Option<u64> {
        None
    }

    /// Whether starting requires a speech engine.
    fn requires_speech(&self) -> bool {
        false
    }

    /// Text to read aloud for a trial, if the game speaks.
    fn speech_prompt(&self, _trial: &Self::Trial) -> Option<String> {
        None
    }
}
