//! The four games of the suite.

pub mod phonics;
pub mod recall;
pub mod stroop;
pub mod timed_recall;

pub use phonics::{PhonicsGame, WordBank, WordEntry, WORD_BANK};
pub use recall::{FallbackRng, RecallGame, RecallTrial, SequenceGenerator};
pub use stroop::{StroopGame, StroopTrial};
pub use timed_recall::{allowed_time_window, TimedRecallGame};
