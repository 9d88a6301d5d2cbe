//! cogbench-core: Scoring engine, similarity evaluator, and data model.
//!
//! This crate defines the trial session records, the four sub-skill scorers,
//! the partial-credit evaluator, and the traits for the external capabilities
//! (classification endpoint, speech engine) the rest of cogbench builds on.

pub mod attention;
pub mod auditory;
pub mod classification;
pub mod error;
pub mod model;
pub mod processing_speed;
pub mod scoring;
pub mod similarity;
pub mod traits;
pub mod working_memory;

pub use attention::AttentionScorer;
pub use auditory::AuditoryProcessingScorer;
pub use classification::{classify_scores, ClassificationOutcome, ClassificationReport};
pub use error::{AssessmentError, GuardError, SpeechError};
pub use model::{GameKind, GameScores, Skill};
pub use processing_speed::ProcessingSpeedScorer;
pub use scoring::{Interpretation, Scorer};
pub use traits::{Classifier, SpeechEngine, Utterance};
pub use working_memory::WorkingMemoryScorer;
