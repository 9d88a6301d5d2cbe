//! Shared scoring machinery: the `Scorer` trait, the session log every scorer
//! wraps, rounding helpers and score interpretation bands.
//!
//! Every scoring function here is total. Empty input scores 0, and a
//! non-finite intermediate result collapses to 0 rather than propagating.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Scorer trait
// ---------------------------------------------------------------------------

/// An accumulator that turns a run of trial sessions into a 0-100 score.
///
/// `score()` is a pure function of the current session list and may be
/// called any number of times, including mid-run for a live display.
pub trait Scorer {
    /// The per-trial record this scorer ingests.
    type Session;
    /// Descriptive sub-metrics reported next to the score.
    type Analysis;

    /// Append one completed trial (failed and timed-out trials included).
    fn add_session(&mut self, session: Self::Session);

    /// The 0-100 score of the sessions recorded so far.
    fn score(&self) -> u32;

    fn analysis(&self) -> Self::Analysis;

    fn sessions(&self) -> &[Self::Session];

    /// Change the denominator of the per-trial point value.
    fn set_max_trials(&mut self, max_trials: u32);

    /// Drop every recorded session.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Session log
// ---------------------------------------------------------------------------

/// Append-only list of sessions plus the configured trial count.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionLog<S> {
    sessions: Vec<S>,
    max_trials: u32,
}

impl<S> SessionLog<S> {
    pub fn new(max_trials: u32) -> Self {
        Self {
            sessions: Vec::new(),
            max_trials,
        }
    }

    pub fn push(&mut self, session: S) {
        self.sessions.push(session);
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    pub fn as_slice(&self) -> &[S] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn max_trials(&self) -> u32 {
        self.max_trials
    }

    pub fn set_max_trials(&mut self, max_trials: u32) {
        self.max_trials = max_trials;
    }

    /// `100 / max_trials`, the most one trial can add to the score.
    ///
    /// A zero trial count is treated as one.
    pub fn points_per_trial(&self) -> f64 {
        100.0 / self.max_trials.max(1) as f64
    }

    /// Number of sessions matching the predicate.
    pub fn count(&self, predicate: impl Fn(&S) -> bool) -> usize {
        self.sessions.iter().filter(|s| predicate(s)).count()
    }

    /// Arithmetic mean of a per-session value, `None` for an empty log.
    pub fn mean(&self, value: impl Fn(&S) -> f64) -> Option<f64> {
        if self.sessions.is_empty() {
            return None;
        }
        let total: f64 = self.sessions.iter().map(value).sum();
        Some(total / self.sessions.len() as f64)
    }
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Round half toward positive infinity (2.5 -> 3, -2.5 -> -2).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to one decimal place, halves rounding up.
pub fn round_to_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// `part / whole` as a percentage with one decimal, 0 for an empty whole.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to_tenth(part as f64 / whole as f64 * 100.0)
}

/// Round a raw point total and clamp it into `0..=100`.
pub fn finalize_score(total: f64) -> u32 {
    if !total.is_finite() {
        return 0;
    }
    round_half_up(total).clamp(0.0, 100.0) as u32
}

// ---------------------------------------------------------------------------
// Interpretation
// ---------------------------------------------------------------------------

/// Qualitative band for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpretation {
    VeryLow,
    Low,
    BelowAverage,
    Average,
    AboveAverage,
    Superior,
    Exceptional,
}

impl Interpretation {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Interpretation::Exceptional,
            80..=89 => Interpretation::Superior,
            70..=79 => Interpretation::AboveAverage,
            60..=69 => Interpretation::Average,
            50..=59 => Interpretation::BelowAverage,
            40..=49 => Interpretation::Low,
            _ => Interpretation::VeryLow,
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Interpretation::VeryLow => "Very Low",
            Interpretation::Low => "Low",
            Interpretation::BelowAverage => "Below Average",
            Interpretation::Average => "Average",
            Interpretation::AboveAverage => "Above Average",
            Interpretation::Superior => "Superior",
            Interpretation::Exceptional => "Exceptional",
        };
        f.write_str(label)
    }
}
