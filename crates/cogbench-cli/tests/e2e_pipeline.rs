//! End-to-end pipeline tests: play every game headlessly, aggregate, classify
//! and persist, using the library crates the CLI is built on.

use std::collections::HashMap;

use cogbench_core::model::GridSize;
use cogbench_core::scoring::{Interpretation, Scorer};
use cogbench_core::{ClassificationOutcome, Skill};
use cogbench_providers::{MockClassifier, ScriptedSpeech, SilentSpeech};
use cogbench_report::{
    AssessmentSummary, GameMode, GameResult, MemoryLedger, ScoreLedger, ScoreTracker,
};
use cogbench_runner::games::{
    PhonicsGame, RecallGame, SequenceGenerator, StroopGame, TimedRecallGame,
};
use cogbench_runner::{
    play, Assessment, AssessmentPhase, GameOutcome, Participant, SimulationError, TrialRunner,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn result_for<S: Scorer>(outcome: &GameOutcome, scorer: &S) -> GameResult
where
    S::Analysis: serde::Serialize,
{
    GameResult {
        kind: outcome.kind,
        skill: outcome.kind.skill(),
        score: outcome.final_score,
        correct: outcome.correct,
        trials: outcome.trials,
        interpretation: Interpretation::from_score(outcome.final_score),
        analysis: serde_json::to_value(scorer.analysis()).unwrap(),
    }
}

#[tokio::test]
async fn full_assessment_pass() {
    let age = 9;
    let mut participant = Participant::new(1.0, 900, 21);
    let mut assessment = Assessment::new().with_age(age);
    let mut summary = AssessmentSummary::new(Some(age));
    let mut ledger = MemoryLedger::new();

    let mut recall = TrialRunner::new(RecallGame::with_generator(SequenceGenerator::with_rng(
        GridSize::Three,
        StdRng::seed_from_u64(1),
    )));
    let outcome = play(&mut recall, age, &mut participant).unwrap();
    assert_eq!(
        assessment.record(Skill::WorkingMemory, outcome.final_score),
        Ok(AssessmentPhase::ProcessingSpeed)
    );
    summary.push_game(result_for(&outcome, recall.scorer()));

    let mode = GameMode::for_game(outcome.kind, GridSize::Three);
    let mut tracker = ScoreTracker::mount(ledger, mode);
    assert!(tracker.on_reset(outcome.correct).unwrap());
    ledger = tracker.into_inner();

    let mut timed = TrialRunner::new(TimedRecallGame::seeded(GridSize::Three, 2));
    let outcome = play(&mut timed, age, &mut participant).unwrap();
    assessment.record(Skill::ProcessingSpeed, outcome.final_score).unwrap();
    summary.push_game(result_for(&outcome, timed.scorer()));

    let mut stroop = TrialRunner::new(StroopGame::seeded(3));
    let outcome = play(&mut stroop, age, &mut participant).unwrap();
    assessment.record(Skill::Attention, outcome.final_score).unwrap();
    summary.push_game(result_for(&outcome, stroop.scorer()));

    let mut tracker = ScoreTracker::mount(ledger, GameMode::Chameleon);
    tracker.on_reset(outcome.correct).unwrap();
    ledger = tracker.into_inner();

    let mut phonics = TrialRunner::new(PhonicsGame::seeded(4)).with_speech(SilentSpeech);
    let outcome = play(&mut phonics, age, &mut participant).unwrap();
    let phase = assessment
        .record(Skill::AuditoryProcessing, outcome.final_score)
        .unwrap();
    assert_eq!(phase, AssessmentPhase::Completed);
    summary.push_game(result_for(&outcome, phonics.scorer()));

    assert!(assessment.take_auto_classification());
    assert!(!assessment.take_auto_classification());

    let classifier = MockClassifier::new(HashMap::from([(Skill::WorkingMemory, 4)]));
    let report = assessment.classify(&classifier).await.unwrap();
    assert_eq!(classifier.call_count(), 4);
    assert_eq!(
        report.get(Skill::WorkingMemory).unwrap().outcome,
        ClassificationOutcome::Level("Above Average".into())
    );
    assert_eq!(
        report.get(Skill::Attention).unwrap().outcome,
        ClassificationOutcome::Level("Minimal Concern".into())
    );
    summary.classification = Some(report);

    assert_eq!(summary.scores(), *assessment.scores());
    let md = summary.to_markdown();
    assert!(md.contains("Working Memory: Above Average"));

    let stored = ledger.read().unwrap().unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|r| r.score == 5));
}

#[test]
fn phonics_refused_without_speech_support() {
    let mut participant = Participant::new(1.0, 900, 8);
    let speech = ScriptedSpeech::unavailable(cogbench_core::SpeechError::Unsupported);
    let mut runner = TrialRunner::new(PhonicsGame::seeded(9)).with_speech(speech);

    assert!(matches!(
        play(&mut runner, 9, &mut participant),
        Err(SimulationError::Refused(_))
    ));
}

#[test]
fn assessment_reset_starts_a_new_pass() {
    let mut assessment = Assessment::new().with_age(11);
    for skill in Skill::ALL {
        assessment.record(skill, 50).unwrap();
    }
    assert!(assessment.ready_for_classification());

    assessment.reset();
    assert_eq!(assessment.phase(), AssessmentPhase::WorkingMemory);
    assert_eq!(assessment.age(), Some(11));
    assert!(!assessment.ready_for_classification());
}
