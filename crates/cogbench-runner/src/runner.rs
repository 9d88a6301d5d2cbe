//! Generic round state machine shared by every game.
//!
//! `Idle -> Presenting -> AwaitingResponse -> Scoring -> (Complete | Presenting)`
//!
//! All timing goes through one [`Scheduler`]. Resolving a trial, starting a
//! new attempt and resetting each cancel every pending timer first, so a
//! stale cue, countdown tick or advance can never fire into a later state.

use cogbench_core::error::{GuardError, SpeechError};
use cogbench_core::model::GameKind;
use cogbench_core::traits::{SpeechEngine, Utterance};
use cogbench_core::Scorer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::game::{Cue, Game, Judgement, TrialContext};
use crate::observer::{GameObserver, NoopObserver, TrialResolution};
use crate::scheduler::Scheduler;

/// Trials per game in the standard flow.
pub const DEFAULT_MAX_TRIALS: u32 = 5;

/// Countdown resolution of timed games.
pub const COUNTDOWN_TICK_MS: u64 = 100;

/// Runner settings that are not specific to a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Trials before the game completes; also the scorer's denominator.
    pub max_trials: u32,
    /// Countdown step. Zero is raised to 1 ms.
    pub countdown_tick_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_trials: DEFAULT_MAX_TRIALS,
            countdown_tick_ms: COUNTDOWN_TICK_MS,
        }
    }
}

/// Where a runner is in its round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Presenting,
    AwaitingResponse,
    Scoring,
    Complete,
}

/// Why a response unit was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Not in `AwaitingResponse`.
    NotAccepting,
    /// The per-click input lock is held.
    Locked,
    /// The game rejected the unit (e.g. a blank spelling).
    Rejected,
}

/// Result of feeding one response unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored(IgnoreReason),
    /// Accepted and correct, more units expected.
    Progress,
    Success,
    Failure,
}

/// Timer payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Cue(Cue),
    OpenResponseWindow,
    CountdownTick,
    Unlock,
    Advance,
}

/// Drives one game through its trials.
pub struct TrialRunner<G: Game> {
    game: G,
    scorer: G::Scorer,
    config: RunnerConfig,
    scheduler: Scheduler<Step>,
    observer: Box<dyn GameObserver<G::Trial>>,
    speech: Option<Box<dyn SpeechEngine>>,

    phase: Phase,
    age: u32,
    blocked: Option<GuardError>,
    trial_index: u32,
    trial: Option<G::Trial>,
    responses: Vec<G::Response>,
    input_locked: bool,
    round_start_ms: u64,
    time_limit_ms: Option<u64>,
    time_left_ms: u64,
    timed_out: bool,
    correct: u32,
    final_score: Option<u32>,
}

impl<G: Game> TrialRunner<G> {
    pub fn new(game: G) -> Self {
        Self::with_config(game, RunnerConfig::default())
    }

    pub fn with_config(game: G, mut config: RunnerConfig) -> Self {
        config.countdown_tick_ms = config.countdown_tick_ms.max(1);
        let mut scorer = G::Scorer::default();
        scorer.set_max_trials(config.max_trials);
        Self {
            game,
            scorer,
            config,
            scheduler: Scheduler::new(),
            observer: Box::new(NoopObserver),
            speech: None,
            phase: Phase::Idle,
            age: 0,
            blocked: None,
            trial_index: 0,
            trial: None,
            responses: Vec::new(),
            input_locked: false,
            round_start_ms: 0,
            time_limit_ms: None,
            time_left_ms: 0,
            timed_out: false,
            correct: 0,
            final_score: None,
        }
    }

    pub fn with_observer(mut self, observer: impl GameObserver<G::Trial> + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Replace the default scorer, e.g. one with a tuned penalty.
    pub fn with_scorer(mut self, mut scorer: G::Scorer) -> Self {
        scorer.set_max_trials(self.config.max_trials);
        self.scorer = scorer;
        self
    }

    pub fn with_speech(mut self, speech: impl SpeechEngine + 'static) -> Self {
        self.speech = Some(Box::new(speech));
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn kind(&self) -> GameKind {
        self.game.kind()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// Guard message of the last refused start, cleared by a successful one.
    pub fn blocked(&self) -> Option<&GuardError> {
        self.blocked.as_ref()
    }

    /// 1-based number of the current trial, 0 before the first.
    pub fn trial_number(&self) -> u32 {
        match self.phase {
            Phase::Idle => 0,
            Phase::Complete => self.trial_index,
            _ => self.trial_index + 1,
        }
    }

    pub fn current_trial(&self) -> Option<&G::Trial> {
        self.trial.as_ref()
    }

    /// Raw number of correctly answered trials this attempt.
    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    pub fn live_score(&self) -> u32 {
        self.scorer.score()
    }

    /// Set once the attempt completes.
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    /// Remaining countdown, `None` when the trial is untimed.
    pub fn time_left_ms(&self) -> Option<u64> {
        self.time_limit_ms.map(|_| self.time_left_ms)
    }

    pub fn scorer(&self) -> &G::Scorer {
        &self.scorer
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Start a fresh attempt.
    ///
    /// Refused without a positive age, or when the game speaks and no speech
    /// engine is available. A refusal sets the blocked flag and leaves the
    /// runner where it was.
    pub fn start(&mut self, age: Option<u32>) -> Result<(), GuardError> {
        if let Err(reason) = self.check_guards(age) {
            warn!(game = %self.game.kind(), "start refused: {reason}");
            self.blocked = Some(reason.clone());
            return Err(reason);
        }

        self.scheduler.cancel_all();
        self.game.reset();
        self.scorer.reset();
        self.scorer.set_max_trials(self.config.max_trials);
        self.age = age.unwrap_or_default();
        self.blocked = None;
        self.trial_index = 0;
        self.correct = 0;
        self.final_score = None;

        info!(game = %self.game.kind(), age = self.age, "game started");
        self.observer.on_live_score(0, 0);
        self.begin_trial();
        Ok(())
    }

    fn check_guards(&self, age: Option<u32>) -> Result<(), GuardError> {
        match age {
            Some(age) if age >= 1 => {}
            _ => return Err(GuardError::MissingAge),
        }
        if self.game.requires_speech() {
            // Voices may still be loading at start; only a missing engine
            // blocks the game. Playback re-checks readiness.
            match &self.speech {
                None => return Err(SpeechError::Unsupported.into()),
                Some(engine) => {
                    if let Err(SpeechError::Unsupported) = engine.readiness() {
                        return Err(SpeechError::Unsupported.into());
                    }
                }
            }
        }
        Ok(())
    }

    /// Abandon the attempt: cancel every timer and any speech, clear the
    /// scorer, return to `Idle`.
    pub fn reset(&mut self) {
        self.scheduler.cancel_all();
        if let Some(speech) = self.speech.as_mut() {
            speech.cancel();
        }
        self.game.reset();
        self.scorer.reset();
        self.phase = Phase::Idle;
        self.blocked = None;
        self.trial_index = 0;
        self.trial = None;
        self.responses.clear();
        self.input_locked = false;
        self.time_limit_ms = None;
        self.time_left_ms = 0;
        self.timed_out = false;
        self.correct = 0;
        self.final_score = None;
        debug!(game = %self.game.kind(), "runner reset");
        self.observer.on_live_score(0, 0);
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    pub fn advance_by(&mut self, delta_ms: u64) {
        let target = self.scheduler.now().saturating_add(delta_ms);
        self.advance_to(target);
    }

    /// Fire every action due up to `target_ms`, in deadline order.
    pub fn advance_to(&mut self, target_ms: u64) {
        while let Some(step) = self.scheduler.pop_due(target_ms) {
            self.fire(step);
        }
        self.scheduler.advance_clock(target_ms);
    }

    /// Jump to the next pending action and fire it. Returns false when
    /// nothing is scheduled.
    pub fn advance_to_next(&mut self) -> bool {
        match self.scheduler.next_deadline() {
            Some(deadline) => {
                self.advance_to(deadline);
                true
            }
            None => false,
        }
    }

    fn fire(&mut self, step: Step) {
        match step {
            Step::Cue(cue) => self.observer.on_highlight(cue.index, cue.lit),
            Step::OpenResponseWindow => self.open_response_window(),
            Step::CountdownTick => self.countdown_tick(),
            Step::Unlock => self.input_locked = false,
            Step::Advance => self.advance_trial(),
        }
    }

    // -----------------------------------------------------------------------
    // Rounds
    // -----------------------------------------------------------------------

    fn begin_trial(&mut self) {
        let trial = self.game.next_trial();
        let presentation = self.game.presentation(&trial);
        let trial_number = self.trial_index + 1;

        self.responses.clear();
        self.input_locked = false;
        self.timed_out = false;
        self.time_limit_ms = None;
        self.time_left_ms = 0;
        self.phase = Phase::Presenting;
        debug!(game = %self.game.kind(), trial = trial_number, ?trial, "presenting");

        self.observer.on_present(trial_number, &trial);
        self.trial = Some(trial);

        for cue in presentation.cues {
            self.scheduler.schedule(cue.offset_ms, Step::Cue(cue));
        }
        if presentation.total_ms == 0 {
            self.open_response_window();
        } else {
            self.scheduler
                .schedule(presentation.total_ms, Step::OpenResponseWindow);
        }
    }

    fn open_response_window(&mut self) {
        self.round_start_ms = self.scheduler.now();
        self.phase = Phase::AwaitingResponse;
        self.time_limit_ms = self.game.time_limit_ms(self.age);

        let trial_number = self.trial_index + 1;
        self.observer
            .on_response_window(trial_number, self.time_limit_ms);

        if let Some(limit) = self.time_limit_ms {
            self.time_left_ms = limit;
            self.observer.on_countdown(limit);
            self.schedule_countdown_tick();
        }
    }

    /// The last step is cut short so expiry lands on the limit itself.
    fn next_tick_ms(&self) -> u64 {
        self.config.countdown_tick_ms.min(self.time_left_ms)
    }

    fn schedule_countdown_tick(&mut self) {
        self.scheduler
            .schedule(self.next_tick_ms(), Step::CountdownTick);
    }

    fn countdown_tick(&mut self) {
        if self.phase != Phase::AwaitingResponse {
            return;
        }
        self.time_left_ms -= self.next_tick_ms();
        self.observer.on_countdown(self.time_left_ms);

        if self.time_left_ms == 0 {
            // Input stays open; the eventual response is just flagged late.
            self.timed_out = true;
            debug!(game = %self.game.kind(), trial = self.trial_index + 1, "countdown expired");
        } else {
            self.schedule_countdown_tick();
        }
    }

    /// Feed one response unit.
    pub fn respond(&mut self, response: G::Response) -> InputOutcome {
        if self.phase != Phase::AwaitingResponse {
            return InputOutcome::Ignored(IgnoreReason::NotAccepting);
        }
        if self.input_locked {
            return InputOutcome::Ignored(IgnoreReason::Locked);
        }
        if !self.game.accepts(&response) {
            return InputOutcome::Ignored(IgnoreReason::Rejected);
        }
        let Some(trial) = self.trial.as_ref() else {
            return InputOutcome::Ignored(IgnoreReason::NotAccepting);
        };

        let position = self.responses.len();
        let judgement = self.game.judge(trial, position, &response);
        self.responses.push(response);

        match judgement {
            Judgement::Continue => {
                let settle = self.game.input_settle_ms();
                if settle > 0 {
                    self.input_locked = true;
                    self.scheduler.schedule(settle, Step::Unlock);
                }
                InputOutcome::Progress
            }
            Judgement::Success => {
                self.resolve(true);
                InputOutcome::Success
            }
            Judgement::Failure => {
                self.resolve(false);
                InputOutcome::Failure
            }
        }
    }

    fn resolve(&mut self, success: bool) {
        self.scheduler.cancel_all();
        self.phase = Phase::Scoring;
        self.input_locked = true;

        let Some(trial) = self.trial.as_ref() else {
            return;
        };
        let context = TrialContext {
            trial_number: self.trial_index + 1,
            response_time_ms: self.scheduler.now().saturating_sub(self.round_start_ms),
            completed_on_time: !self.timed_out,
            allowed_time_ms: self.time_limit_ms,
        };

        let session = self
            .game
            .build_session(trial, &self.responses, success, &context);
        let feedback = self.game.feedback(trial, &self.responses, success);
        self.scorer.add_session(session);
        if success {
            self.correct += 1;
        }

        let live = self.scorer.score();
        debug!(
            game = %self.game.kind(),
            trial = context.trial_number,
            success,
            response_time_ms = context.response_time_ms,
            live_score = live,
            "trial resolved"
        );

        self.observer.on_trial_resolved(&TrialResolution {
            trial_number: context.trial_number,
            success,
            response_time_ms: context.response_time_ms,
            completed_on_time: context.completed_on_time,
            feedback,
        });
        self.observer.on_live_score(live, self.correct);

        self.scheduler.schedule(self.game.settle_ms(), Step::Advance);
    }

    fn advance_trial(&mut self) {
        self.trial_index += 1;
        if self.trial_index >= self.config.max_trials {
            let score = self.scorer.score();
            self.phase = Phase::Complete;
            self.input_locked = false;
            self.final_score = Some(score);
            info!(
                game = %self.game.kind(),
                score,
                correct = self.correct,
                "game complete"
            );
            self.observer.on_complete(self.game.kind(), score);
        } else {
            self.begin_trial();
        }
    }

    // -----------------------------------------------------------------------
    // Speech
    // -----------------------------------------------------------------------

    /// Read the current trial's prompt aloud.
    ///
    /// Rejected with a [`SpeechError`] when there is no engine, voices are
    /// not loaded, or no trial is showing.
    pub fn speak_prompt(&mut self) -> Result<(), SpeechError> {
        let text = self
            .trial
            .as_ref()
            .filter(|_| matches!(self.phase, Phase::Presenting | Phase::AwaitingResponse))
            .and_then(|trial| self.game.speech_prompt(trial))
            .ok_or(SpeechError::NoPrompt)?;

        let engine = self.speech.as_mut().ok_or(SpeechError::Unsupported)?;
        engine.readiness()?;
        engine.cancel();
        engine.speak(&Utterance::slow(text))
    }

    /// Completion signal of the last prompt.
    pub fn is_speaking(&self) -> bool {
        self.speech.as_ref().is_some_and(|s| s.is_speaking())
    }
}

impl<G: Game> Drop for TrialRunner<G> {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
        if let Some(speech) = self.speech.as_mut() {
            speech.cancel();
        }
    }
}
