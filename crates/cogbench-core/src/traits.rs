//! Collaborator traits the core depends on but does not implement.
//!
//! `Classifier` is implemented over HTTP (and mocked) in `cogbench-providers`;
//! `SpeechEngine` is whatever text-to-speech the host has, with fakes in the
//! same crate for headless runs and tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SpeechError;
use crate::model::Skill;

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Remote service that maps an age and a sub-score to a level index.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Human-readable backend name (e.g. "http").
    fn name(&self) -> &str;

    /// Ask for the level of one sub-skill.
    async fn predict(&self, request: &PredictionRequest) -> anyhow::Result<Prediction>;
}

/// One classification call. `score` is already in wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub skill: Skill,
    pub age: u32,
    pub score: u32,
}

/// Response body of the prediction endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted: i64,
}

// ---------------------------------------------------------------------------
// Speech
// ---------------------------------------------------------------------------

/// A word to be read aloud and the voice settings to read it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    /// Slow, clear settings used for spelling prompts.
    pub fn slow(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rate: 0.7,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Text-to-speech capability.
///
/// Implementations must not panic when speech is unavailable; they report it
/// through `readiness()` and reject `speak`.
pub trait SpeechEngine: Send {
    /// `Ok(())` once voices are loaded and playback is possible.
    fn readiness(&self) -> Result<(), SpeechError>;

    /// Start speaking, replacing anything currently playing.
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Completion signal: false once the last utterance has finished.
    fn is_speaking(&self) -> bool;

    /// Stop any in-flight playback.
    fn cancel(&mut self);
}
