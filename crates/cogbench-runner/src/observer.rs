//! Presentation-side callbacks emitted by the trial runner.

use std::sync::{Arc, Mutex};

use cogbench_core::model::GameKind;
use serde::Serialize;

/// What happened when a trial resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialResolution {
    pub trial_number: u32,
    pub success: bool,
    pub response_time_ms: u64,
    pub completed_on_time: bool,
    pub feedback: Option<String>,
}

/// Receives every visible state change of a running game.
///
/// The runner never knows how these are displayed.
pub trait GameObserver<T>: Send {
    /// A new trial is about to be presented.
    fn on_present(&mut self, trial_number: u32, trial: &T);
    /// A presentation cue fired.
    fn on_highlight(&mut self, index: usize, lit: bool);
    /// Responses are now accepted. Carries the countdown length when timed.
    fn on_response_window(&mut self, trial_number: u32, time_limit_ms: Option<u64>);
    fn on_countdown(&mut self, remaining_ms: u64);
    fn on_trial_resolved(&mut self, resolution: &TrialResolution);
    /// Live sub-score and raw correct count after a trial.
    fn on_live_score(&mut self, score: u32, correct: u32);
    fn on_complete(&mut self, kind: GameKind, final_score: u32);
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl<T> GameObserver<T> for NoopObserver {
    fn on_present(&mut self, _: u32, _: &T) {}
    fn on_highlight(&mut self, _: usize, _: bool) {}
    fn on_response_window(&mut self, _: u32, _: Option<u64>) {}
    fn on_countdown(&mut self, _: u64) {}
    fn on_trial_resolved(&mut self, _: &TrialResolution) {}
    fn on_live_score(&mut self, _: u32, _: u32) {}
    fn on_complete(&mut self, _: GameKind, _: u32) {}
}

/// A single observed callback.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent<T> {
    Present { trial_number: u32, trial: T },
    Highlight { index: usize, lit: bool },
    ResponseWindow { trial_number: u32, time_limit_ms: Option<u64> },
    Countdown { remaining_ms: u64 },
    TrialResolved(TrialResolution),
    LiveScore { score: u32, correct: u32 },
    Complete { kind: GameKind, final_score: u32 },
}

/// Records every callback into a shared log.
///
/// Clone it before handing it to a runner and read the log from the clone.
#[derive(Debug)]
pub struct RecordingObserver<T> {
    events: Arc<Mutex<Vec<ObservedEvent<T>>>>,
    record_countdown: bool,
}

impl<T> Clone for RecordingObserver<T> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            record_countdown: self.record_countdown,
        }
    }
}

impl<T: Clone> RecordingObserver<T> {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            record_countdown: true,
        }
    }

    /// Skip the 100 ms countdown ticks, which dominate long logs.
    pub fn without_countdown(mut self) -> Self {
        self.record_countdown = false;
        self
    }

    pub fn events(&self) -> Vec<ObservedEvent<T>> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    fn push(&self, event: ObservedEvent<T>) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl<T: Clone> Default for RecordingObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send> GameObserver<T> for RecordingObserver<T> {
    fn on_present(&mut self, trial_number: u32, trial: &T) {
        self.push(ObservedEvent::Present {
            trial_number,
            trial: trial.clone(),
        });
    }

    fn on_highlight(&mut self, index: usize, lit: bool) {
        self.push(ObservedEvent::Highlight { index, lit });
    }

    fn on_response_window(&mut self, trial_number: u32, time_limit_ms: Option<u64>) {
        self.push(ObservedEvent::ResponseWindow {
            trial_number,
            time_limit_ms,
        });
    }

    fn on_countdown(&mut self, remaining_ms: u64) {
        if self.record_countdown {
            self.push(ObservedEvent::Countdown { remaining_ms });
        }
    }

    fn on_trial_resolved(&mut self, resolution: &TrialResolution) {
        self.push(ObservedEvent::TrialResolved(resolution.clone()));
    }

    fn on_live_score(&mut self, score: u32, correct: u32) {
        self.push(ObservedEvent::LiveScore { score, correct });
    }

    fn on_complete(&mut self, kind: GameKind, final_score: u32) {
        self.push(ObservedEvent::Complete { kind, final_score });
    }
}
