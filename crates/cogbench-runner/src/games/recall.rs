//! Untimed sequence recall on a square grid (working memory).
//!
//! Each trial grows the sequence by one cell. The sequence is played back
//! cell by cell, then the participant clicks it back in order.

use cogbench_core::model::{GameKind, GridSize, RecallSession};
use cogbench_core::WorkingMemoryScorer;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use tracing::{debug, warn};

use crate::game::{Cue, Game, Judgement, Presentation, TrialContext};

/// Draws allowed per step before an immediate repeat is accepted.
pub const MAX_REPEAT_DRAWS: u32 = 50;

pub const LEAD_IN_MS: u64 = 300;
pub const SLOT_MS: u64 = 1000;
pub const HIGHLIGHT_MS: u64 = 700;
pub const TRAIL_OUT_MS: u64 = 500;

pub const DEFAULT_SETTLE_MS: u64 = 1200;
/// Input lock after each correct click that does not finish the sequence.
pub const CLICK_SETTLE_MS: u64 = 200;

// ---------------------------------------------------------------------------
// Sequence generation
// ---------------------------------------------------------------------------

/// Reads from `primary` until it fails once, then switches for good to a
/// clock-seeded [`StdRng`].
pub struct FallbackRng<R> {
    primary: R,
    fallback: Option<StdRng>,
}

impl<R: RngCore> FallbackRng<R> {
    pub fn new(primary: R) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.fallback.is_some()
    }
}

impl<R: RngCore> RngCore for FallbackRng<R> {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Some(fallback) = self.fallback.as_mut() {
            fallback.fill_bytes(dest);
            return;
        }
        if let Err(e) = self.primary.try_fill_bytes(dest) {
            warn!(error = %e, "random source failed, using clock-seeded generator");
            let seed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default();
            self.fallback
                .insert(StdRng::seed_from_u64(seed))
                .fill_bytes(dest);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Grows a recall sequence one random cell at a time.
pub struct SequenceGenerator {
    grid: GridSize,
    rng: Box<dyn RngCore + Send>,
    sequence: Vec<usize>,
    last_draws: u32,
}

impl SequenceGenerator {
    /// Generator backed by the operating system's random source, falling
    /// back to a clock-seeded one if that source fails.
    pub fn new(grid: GridSize) -> Self {
        Self::with_rng(grid, FallbackRng::new(OsRng))
    }

    pub fn with_rng(grid: GridSize, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            grid,
            rng: Box::new(rng),
            sequence: Vec::new(),
            last_draws: 0,
        }
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// How many draws the most recent step took.
    pub fn last_draws(&self) -> u32 {
        self.last_draws
    }

    pub fn reset(&mut self) {
        self.sequence.clear();
        self.last_draws = 0;
    }

    /// Append one step and return the whole sequence.
    ///
    /// The first step is a single draw. Later steps redraw up to
    /// [`MAX_REPEAT_DRAWS`] times to avoid repeating the previous cell, then
    /// accept whatever came last.
    pub fn extend(&mut self) -> &[usize] {
        let cells = self.grid.cells();
        let previous = self.sequence.last().copied();

        let mut draws = 0;
        let step = loop {
            let candidate = self.rng.gen_range(0..cells);
            draws += 1;
            match previous {
                Some(prev) if candidate == prev && draws < MAX_REPEAT_DRAWS => continue,
                _ => break candidate,
            }
        };

        if previous == Some(step) {
            debug!(cell = step, draws, "accepted repeated step");
        }
        self.last_draws = draws;
        self.sequence.push(step);
        &self.sequence
    }
}

// ---------------------------------------------------------------------------
// Shared recall rules
// ---------------------------------------------------------------------------

/// A recall trial: the whole sequence to reproduce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecallTrial {
    pub grid: GridSize,
    pub sequence: Vec<usize>,
}

/// Fixed playback choreography: 300 ms lead-in, each cell lit for 700 ms of
/// its 1000 ms slot, 500 ms trail-out.
pub fn recall_presentation(sequence: &[usize]) -> Presentation {
    let mut cues = Vec::with_capacity(sequence.len() * 2);
    for (i, &cell) in sequence.iter().enumerate() {
        let slot_start = LEAD_IN_MS + i as u64 * SLOT_MS;
        cues.push(Cue {
            offset_ms: slot_start,
            index: cell,
            lit: true,
        });
        cues.push(Cue {
            offset_ms: slot_start + HIGHLIGHT_MS,
            index: cell,
            lit: false,
        });
    }
    Presentation {
        cues,
        total_ms: LEAD_IN_MS + sequence.len() as u64 * SLOT_MS + TRAIL_OUT_MS,
    }
}

/// Compare a clicked cell against the sequence at `position`.
pub fn judge_click(sequence: &[usize], position: usize, cell: usize) -> Judgement {
    match sequence.get(position) {
        Some(&expected) if expected == cell => {
            if position + 1 == sequence.len() {
                Judgement::Success
            } else {
                Judgement::Continue
            }
        }
        _ => Judgement::Failure,
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

pub struct RecallGame {
    generator: SequenceGenerator,
    settle_ms: u64,
}

impl RecallGame {
    pub fn new(grid: GridSize) -> Self {
        Self::with_generator(SequenceGenerator::new(grid))
    }

    pub fn with_generator(generator: SequenceGenerator) -> Self {
        Self {
            generator,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    pub fn with_settle_ms(mut self, settle_ms: u64) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    pub fn generator(&self) -> &SequenceGenerator {
        &self.generator
    }
}

impl Game for RecallGame {
    type Trial = RecallTrial;
    type Response = usize;
    type Session = RecallSession;
    type Scorer = WorkingMemoryScorer;

    fn kind(&self) -> GameKind {
        GameKind::SequenceRecall
    }

    fn reset(&mut self) {
        self.generator.reset();
    }

    fn next_trial(&mut self) -> RecallTrial {
        let sequence = self.generator.extend().to_vec();
        RecallTrial {
            grid: self.generator.grid(),
            sequence,
        }
    }

    fn presentation(&self, trial: &RecallTrial) -> Presentation {
        recall_presentation(&trial.sequence)
    }

    fn judge(&self, trial: &RecallTrial, position: usize, cell: &usize) -> Judgement {
        judge_click(&trial.sequence, position, *cell)
    }

    fn build_session(
        &self,
        trial: &RecallTrial,
        _responses: &[usize],
        success: bool,
        context: &TrialContext,
    ) -> RecallSession {
        RecallSession {
            trial_number: context.trial_number,
            grid_size: trial.grid,
            sequence_length: trial.sequence.len(),
            success,
            attempts: 1,
            total_rounds: context.trial_number,
            response_time_ms: context.response_time_ms,
        }
    }

    fn settle_ms(&self) -> u64 {
        self.settle_ms
    }

    fn input_settle_ms(&self) -> u64 {
        CLICK_SETTLE_MS
    }
}
