//! Trial runner for cogbench games.
//!
//! [`TrialRunner`] drives any [`Game`] through presentation, response and
//! scoring on a virtual clock owned by a [`Scheduler`]. Nothing here sleeps:
//! callers advance time explicitly, which keeps runs deterministic.
//! [`Assessment`] strings the four games together and decides when the
//! sub-scores are ready to classify.

pub mod assessment;
pub mod game;
pub mod games;
pub mod observer;
pub mod runner;
pub mod scheduler;
pub mod simulation;

pub use assessment::{Assessment, AssessmentPhase};
pub use game::{Cue, Game, Judgement, Presentation, TrialContext};
pub use observer::{GameObserver, NoopObserver, ObservedEvent, RecordingObserver, TrialResolution};
pub use runner::{IgnoreReason, InputOutcome, Phase, RunnerConfig, TrialRunner};
pub use scheduler::Scheduler;
pub use simulation::{play, GameOutcome, Participant, ScriptedAnswer, SimulationError};
