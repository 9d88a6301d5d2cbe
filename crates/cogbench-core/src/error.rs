//! Error types shared across the cogbench crates.
//!
//! None of these represent a crash: a refused start leaves the runner idle
//! with a guard message, a rejected speech request leaves the trial running.

use thiserror::Error;

use crate::model::Skill;

/// Why a game refused to start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// No age was entered, or the age is below 1.
    #[error("please enter your age before starting the game")]
    MissingAge,

    /// The game needs speech and the speech capability is not ready.
    #[error("this game requires speech synthesis: {0}")]
    SpeechUnavailable(#[from] SpeechError),
}

/// A rejected speech playback attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    /// The device has no speech synthesis at all.
    #[error("speech synthesis is not supported on this device")]
    Unsupported,

    /// Voices have not finished loading yet.
    #[error("voices are still loading, wait a moment and try again")]
    VoicesLoading,

    /// There is no current word to play.
    #[error("there is no word to play right now")]
    NoPrompt,

    /// Playback started but the engine reported a failure.
    #[error("speech failed: {0}")]
    Failed(String),
}

/// Errors raised by the assessment aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssessmentError {
    /// The sub-score was already written during this pass.
    #[error("{0} score already recorded for this assessment pass")]
    AlreadyRecorded(Skill),

    /// A sub-score outside 0-100 was supplied.
    #[error("score {0} is outside the 0-100 range")]
    OutOfRange(u32),

    /// Classification was requested without an age or any non-zero score.
    #[error("Please enter valid age and complete at least one game")]
    NothingToClassify,
}
