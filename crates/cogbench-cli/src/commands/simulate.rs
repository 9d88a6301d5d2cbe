//! The `cogbench simulate` command.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use cogbench_core::model::GridSize;
use cogbench_core::scoring::{Interpretation, Scorer};
use cogbench_core::ProcessingSpeedScorer;
use cogbench_providers::config::{load_config_from, CogbenchConfig};
use cogbench_providers::{create_classifier, SilentSpeech};
use cogbench_report::{AssessmentSummary, GameMode, GameResult, JsonFileLedger, ScoreTracker};
use cogbench_runner::games::{
    PhonicsGame, RecallGame, SequenceGenerator, StroopGame, TimedRecallGame,
};
use cogbench_runner::{
    play, Assessment, GameObserver, Participant, RunnerConfig, ScriptedAnswer, TrialResolution,
    TrialRunner,
};

pub struct SimulateArgs {
    pub age: u32,
    pub grid: Option<u8>,
    pub accuracy: f64,
    pub response_ms: u64,
    pub seed: Option<u64>,
    pub classify: bool,
    pub classifier: Option<String>,
    pub record: bool,
    pub format: String,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Prints each resolved trial to stderr.
struct ConsoleObserver;

impl<T> GameObserver<T> for ConsoleObserver {
    fn on_present(&mut self, _trial_number: u32, _trial: &T) {}

    fn on_highlight(&mut self, _index: usize, _lit: bool) {}

    fn on_response_window(&mut self, _trial_number: u32, _time_limit_ms: Option<u64>) {}

    fn on_countdown(&mut self, _remaining_ms: u64) {}

    fn on_trial_resolved(&mut self, resolution: &TrialResolution) {
        let mark = if resolution.success { "OK" } else { "MISS" };
        let late = if resolution.completed_on_time {
            ""
        } else {
            " (late)"
        };
        eprintln!(
            "    trial {} {mark} {}ms{late}",
            resolution.trial_number, resolution.response_time_ms
        );
    }

    fn on_live_score(&mut self, _score: u32, _correct: u32) {}

    fn on_complete(&mut self, kind: cogbench_core::GameKind, final_score: u32) {
        eprintln!("  Done: {kind} scored {final_score}");
    }
}

/// One independent seed per random stream of a run, in a fixed order:
/// participant, recall, timed recall, Stroop, phonics.
fn stream_seeds(seed: u64) -> [u64; 5] {
    let mut rng = StdRng::seed_from_u64(seed);
    std::array::from_fn(|_| rng.gen())
}

struct Session<'a> {
    age: u32,
    grid: GridSize,
    record: bool,
    config: &'a CogbenchConfig,
    participant: Participant,
    assessment: Assessment,
    summary: AssessmentSummary,
}

impl Session<'_> {
    fn run<G>(&mut self, mut runner: TrialRunner<G>) -> Result<()>
    where
        G: ScriptedAnswer,
        <G::Scorer as Scorer>::Analysis: Serialize,
    {
        let kind = runner.kind();
        eprintln!("  Starting: {kind}");
        let outcome = play(&mut runner, self.age, &mut self.participant)
            .with_context(|| format!("{kind} did not finish"))?;

        self.assessment
            .record(kind.skill(), outcome.final_score)
            .with_context(|| format!("failed to record {kind}"))?;

        let analysis = serde_json::to_value(runner.scorer().analysis())
            .context("failed to serialize analysis")?;
        self.summary.push_game(GameResult {
            kind,
            skill: kind.skill(),
            score: outcome.final_score,
            correct: outcome.correct,
            trials: outcome.trials,
            interpretation: Interpretation::from_score(outcome.final_score),
            analysis,
        });

        if self.record {
            let ledger = JsonFileLedger::new(&self.config.ledger_path);
            let mut tracker = ScoreTracker::mount(ledger, GameMode::for_game(kind, self.grid));
            let saved = tracker
                .on_reset(outcome.correct)
                .with_context(|| format!("failed to save {kind} to the ledger"))?;
            debug!(game = %kind, mode = %tracker.mode(), saved, "ledger updated");
        }
        Ok(())
    }
}

pub async fn execute(args: SimulateArgs) -> Result<()> {
    let mut config = load_config_from(args.config.as_deref())?;
    if let Some(backend) = &args.classifier {
        config.classifier.backend = backend.clone();
    }
    if !(0.0..=1.0).contains(&args.accuracy) {
        anyhow::bail!("accuracy must be between 0.0 and 1.0, got {}", args.accuracy);
    }

    let grid = match args.grid {
        Some(side) => GridSize::try_from(side).map_err(|e| anyhow!(e))?,
        None => config.assessment.grid_size,
    };
    let seed = args
        .seed
        .unwrap_or_else(|| Utc::now().timestamp_millis() as u64);
    let [participant_seed, recall_seed, timed_seed, stroop_seed, phonics_seed] =
        stream_seeds(seed);
    let tuning = &config.assessment;
    let runner_config = RunnerConfig {
        max_trials: tuning.max_trials,
        ..Default::default()
    };

    info!(
        age = args.age,
        %grid,
        accuracy = args.accuracy,
        response_ms = args.response_ms,
        seed,
        "simulation started"
    );

    let mut session = Session {
        age: args.age,
        grid,
        record: args.record,
        config: &config,
        participant: Participant::new(args.accuracy, args.response_ms, participant_seed),
        assessment: Assessment::new().with_age(args.age),
        summary: AssessmentSummary::new(Some(args.age)),
    };

    let recall = RecallGame::with_generator(SequenceGenerator::with_rng(
        grid,
        StdRng::seed_from_u64(recall_seed),
    ))
    .with_settle_ms(tuning.recall_settle_ms);
    session.run(TrialRunner::with_config(recall, runner_config).with_observer(ConsoleObserver))?;

    let mut speed_scorer = ProcessingSpeedScorer::default();
    speed_scorer.set_timeout_penalty(tuning.timeout_penalty);
    let timed =
        TimedRecallGame::seeded(grid, timed_seed).with_settle_ms(tuning.recall_settle_ms);
    session.run(
        TrialRunner::with_config(timed, runner_config)
            .with_scorer(speed_scorer)
            .with_observer(ConsoleObserver),
    )?;

    let stroop = StroopGame::seeded(stroop_seed).with_settle_ms(tuning.stroop_settle_ms);
    session.run(TrialRunner::with_config(stroop, runner_config).with_observer(ConsoleObserver))?;

    let phonics =
        PhonicsGame::seeded(phonics_seed).with_settle_ms(tuning.phonics_settle_ms);
    session.run(
        TrialRunner::with_config(phonics, runner_config)
            .with_speech(SilentSpeech)
            .with_observer(ConsoleObserver),
    )?;

    let Session {
        mut assessment,
        mut summary,
        ..
    } = session;

    if args.classify {
        if assessment.take_auto_classification() {
            info!("all games complete, classifying");
        }
        let classifier = create_classifier(&config.classifier)?;
        match assessment.classify(classifier.as_ref()).await {
            Ok(report) => summary.classification = Some(report),
            Err(e) => warn!("classification skipped: {e}"),
        }
    }

    if let Some(path) = &args.output {
        summary.save_json(path)?;
        eprintln!("Summary written to {}", path.display());
    }

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "markdown" | "md" => println!("{}", summary.to_markdown()),
        "text" => print_summary(&summary),
        other => anyhow::bail!("unknown format: {other} (expected text, json or markdown)"),
    }

    Ok(())
}

fn print_summary(summary: &AssessmentSummary) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Skill", "Game", "Score", "Correct", "Interpretation"]);
    for g in &summary.games {
        table.add_row(vec![
            Cell::new(g.skill),
            Cell::new(g.kind),
            Cell::new(g.score),
            Cell::new(format!("{}/{}", g.correct, g.trials)),
            Cell::new(g.interpretation),
        ]);
    }
    println!("{table}");

    if let Some(report) = &summary.classification {
        println!("Classification: {}", report.summary());
    }
}
