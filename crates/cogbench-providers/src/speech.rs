//! Speech engines for headless play.
//!
//! Neither produces audio. `SilentSpeech` accepts everything and finishes
//! instantly; `ScriptedSpeech` lets a test or the simulator decide readiness
//! and when playback ends, and keeps a log of what was asked of it.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use cogbench_core::error::SpeechError;
use cogbench_core::traits::{SpeechEngine, Utterance};

/// Always ready, never busy.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeech;

impl SpeechEngine for SilentSpeech {
    fn readiness(&self) -> Result<(), SpeechError> {
        Ok(())
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        debug!(word = %utterance.text, "silent speech");
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        false
    }

    fn cancel(&mut self) {}
}

#[derive(Debug, Default)]
struct ScriptState {
    readiness: Option<SpeechError>,
    spoken: Vec<Utterance>,
    speaking: bool,
    cancels: u32,
}

/// Speech fake with shared, inspectable state.
///
/// Clones share state, so one handle can go into a runner while another is
/// kept for assertions.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSpeech {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedSpeech {
    /// Ready engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine stuck in the given readiness error.
    pub fn unavailable(reason: SpeechError) -> Self {
        let speech = Self::default();
        speech.set_readiness(Some(reason));
        speech
    }

    fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// `None` makes the engine ready.
    pub fn set_readiness(&self, readiness: Option<SpeechError>) {
        self.state().readiness = readiness;
    }

    /// End the current utterance.
    pub fn finish(&self) {
        self.state().speaking = false;
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.state().spoken.clone()
    }

    pub fn cancel_count(&self) -> u32 {
        self.state().cancels
    }
}

impl SpeechEngine for ScriptedSpeech {
    fn readiness(&self) -> Result<(), SpeechError> {
        match &self.state().readiness {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        self.readiness()?;
        let mut state = self.state();
        state.spoken.push(utterance.clone());
        state.speaking = true;
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        self.state().speaking
    }

    fn cancel(&mut self) {
        let mut state = self.state();
        state.speaking = false;
        state.cancels += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_speech_is_always_ready() {
        let mut speech = SilentSpeech;
        assert!(speech.readiness().is_ok());
        speech.speak(&Utterance::slow("tape")).unwrap();
        assert!(!speech.is_speaking());
    }

    #[test]
    fn scripted_speech_tracks_playback() {
        let handle = ScriptedSpeech::new();
        let mut engine = handle.clone();

        engine.speak(&Utterance::slow("knife")).unwrap();
        assert!(handle.is_speaking());
        handle.finish();
        assert!(!engine.is_speaking());

        engine.speak(&Utterance::slow("cave")).unwrap();
        engine.cancel();
        assert!(!handle.is_speaking());
        assert_eq!(handle.cancel_count(), 1);

        let words: Vec<String> = handle.spoken().into_iter().map(|u| u.text).collect();
        assert_eq!(words, vec!["knife", "cave"]);
    }

    #[test]
    fn unavailable_engine_rejects_playback() {
        let handle = ScriptedSpeech::unavailable(SpeechError::VoicesLoading);
        let mut engine = handle.clone();
        assert_eq!(
            engine.speak(&Utterance::slow("tape")),
            Err(SpeechError::VoicesLoading)
        );
        assert!(handle.spoken().is_empty());

        handle.set_readiness(None);
        engine.speak(&Utterance::slow("tape")).unwrap();
        assert_eq!(handle.spoken().len(), 1);
    }
}
