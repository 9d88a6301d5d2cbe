//! Phonics spelling game (auditory processing).
//!
//! A word is read aloud on request and the participant types it. Words come
//! from a small fixed bank without replacement until the bank runs dry.

use cogbench_core::error::SpeechError;
use cogbench_core::model::{GameKind, SpellingSession};
use cogbench_core::scoring::round_half_up;
use cogbench_core::similarity::positional_accuracy;
use cogbench_core::AuditoryProcessingScorer;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::game::{Game, Judgement, TrialContext};
use crate::runner::TrialRunner;

pub const DEFAULT_SETTLE_MS: u64 = 3000;

/// A spelling target with the picture and hint shown beside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordEntry {
    pub word: &'static str,
    pub image: &'static str,
    pub description: &'static str,
}

pub const WORD_BANK: [WordEntry; 5] = [
    WordEntry {
        word: "magazine",
        image: "📖",
        description: "A book with pictures and stories",
    },
    WordEntry {
        word: "dinosaur",
        image: "🦕",
        description: "A big animal from long ago",
    },
    WordEntry {
        word: "knife",
        image: "🔪",
        description: "A tool for cutting",
    },
    WordEntry {
        word: "tape",
        image: "📼",
        description: "Something sticky that holds things together",
    },
    WordEntry {
        word: "cave",
        image: "🕳️",
        description: "A hollow place in a rock or mountain",
    },
];

/// Draws words uniformly without replacement, refilling when exhausted.
#[derive(Debug, Clone)]
pub struct WordBank {
    entries: Vec<WordEntry>,
    used: Vec<&'static str>,
}

impl WordBank {
    pub fn new(entries: Vec<WordEntry>) -> Self {
        Self {
            entries,
            used: Vec::new(),
        }
    }

    pub fn used(&self) -> &[&'static str] {
        &self.used
    }

    pub fn reset(&mut self) {
        self.used.clear();
    }

    /// Next word. Once every word has been used the used-set empties and any
    /// word, including the one just played, is eligible again.
    ///
    /// Returns `None` only for an empty bank.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<WordEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let available: Vec<&WordEntry> = self
            .entries
            .iter()
            .filter(|e| !self.used.contains(&e.word))
            .collect();

        let entry = if available.is_empty() {
            debug!("word bank exhausted, refilling");
            self.used.clear();
            self.entries[rng.gen_range(0..self.entries.len())]
        } else {
            *available[rng.gen_range(0..available.len())]
        };
        self.used.push(entry.word);
        Some(entry)
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self::new(WORD_BANK.to_vec())
    }
}

/// Case-insensitive match of the trimmed attempt.
pub fn is_exact_spelling(word: &str, attempt: &str) -> bool {
    attempt.trim().to_lowercase() == word.to_lowercase()
}

pub struct PhonicsGame {
    bank: WordBank,
    rng: Box<dyn RngCore + Send>,
    settle_ms: u64,
}

impl PhonicsGame {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            bank: WordBank::default(),
            rng: Box::new(rng),
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    pub fn with_settle_ms(mut self, settle_ms: u64) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    pub fn bank(&self) -> &WordBank {
        &self.bank
    }
}

impl Default for PhonicsGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for PhonicsGame {
    type Trial = WordEntry;
    type Response = String;
    type Session = SpellingSession;
    type Scorer = AuditoryProcessingScorer;

    fn kind(&self) -> GameKind {
        GameKind::Phonics
    }

    fn reset(&mut self) {
        self.bank.reset();
    }

    fn next_trial(&mut self) -> WordEntry {
        // The default bank is never empty.
        self.bank.draw(&mut self.rng).unwrap_or(WORD_BANK[0])
    }

    fn accepts(&self, attempt: &String) -> bool {
        !attempt.trim().is_empty()
    }

    fn judge(&self, trial: &WordEntry, _position: usize, attempt: &String) -> Judgement {
        if is_exact_spelling(trial.word, attempt) {
            Judgement::Success
        } else {
            Judgement::Failure
        }
    }

    fn build_session(
        &self,
        trial: &WordEntry,
        responses: &[String],
        success: bool,
        context: &TrialContext,
    ) -> SpellingSession {
        let spelling = responses
            .last()
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        // Live positional accuracy, not the blended scorer formula.
        let phoneme_accuracy = positional_accuracy(trial.word, &spelling);
        SpellingSession {
            trial_number: context.trial_number,
            word: trial.word.to_string(),
            user_spelling: spelling,
            is_correct: success,
            partial_credit: if success { 1.0 } else { phoneme_accuracy },
            response_time_ms: context.response_time_ms,
            phoneme_accuracy,
        }
    }

    fn feedback(&self, trial: &WordEntry, responses: &[String], success: bool) -> Option<String> {
        if success {
            return Some("Perfect spelling!".to_string());
        }
        let spelling = responses.last().map(|s| s.trim()).unwrap_or_default();
        let percent = round_half_up(positional_accuracy(trial.word, spelling) * 100.0) as u32;
        Some(format!(
            "Not quite right. The word was \"{}\". You got {percent}% of the sounds right!",
            trial.word
        ))
    }

    fn settle_ms(&self) -> u64 {
        self.settle_ms
    }

    fn requires_speech(&self) -> bool {
        true
    }

    fn speech_prompt(&self, trial: &WordEntry) -> Option<String> {
        Some(trial.word.to_string())
    }
}

impl TrialRunner<PhonicsGame> {
    /// Play the current word. Playback is always user-initiated.
    pub fn speak_word(&mut self) -> Result<(), SpeechError> {
        self.speak_prompt()
    }
}
