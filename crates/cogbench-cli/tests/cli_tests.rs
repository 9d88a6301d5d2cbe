//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Runs inside `dir` with HOME pointed there, so no user config leaks in.
fn cogbench(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("cogbench").unwrap();
    cmd.current_dir(dir).env("HOME", dir).env_remove("COGBENCH_CLASSIFIER_URL");
    cmd
}

fn simulate_json(dir: &Path, extra: &[&str]) -> serde_json::Value {
    let output = cogbench(dir)
        .args(["simulate", "--age", "9", "--format", "json"])
        .args(extra)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "simulate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    cogbench(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cognitive assessment games"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    cogbench(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cogbench"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    cogbench(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created cogbench.toml"))
        .stdout(predicate::str::contains("Created sessions/example-stroop.json"));

    let config = std::fs::read_to_string(dir.path().join("cogbench.toml")).unwrap();
    assert!(config.starts_with("# cogbench configuration"));
    assert!(config.contains("[classifier]"));
    assert!(config.contains("[assessment]"));
    assert!(dir.path().join("sessions/example-stroop.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    cogbench(dir.path()).arg("init").assert().success();

    cogbench(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn score_example_sessions() {
    let dir = TempDir::new().unwrap();
    cogbench(dir.path()).arg("init").assert().success();

    cogbench(dir.path())
        .args(["score", "--game", "stroop", "--sessions", "sessions/example-stroop.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessions:       5"))
        .stdout(predicate::str::contains("Interpretation:"));

    let output = cogbench(dir.path())
        .args([
            "score",
            "--game",
            "stroop",
            "--sessions",
            "sessions/example-stroop.json",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["sessions"], 5);
    assert!(parsed["score"].as_u64().unwrap() <= 100);
    assert!(parsed["analysis"].is_object());
}

#[test]
fn score_rejects_unknown_game_and_bad_sessions() {
    let dir = TempDir::new().unwrap();
    let sessions = dir.path().join("sessions.json");
    std::fs::write(&sessions, "[]").unwrap();

    cogbench(dir.path())
        .args(["score", "--game", "chess", "--sessions"])
        .arg(&sessions)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown game"));

    std::fs::write(&sessions, r#"[{"trial_number": 1}]"#).unwrap();
    cogbench(dir.path())
        .args(["score", "--game", "recall", "--sessions"])
        .arg(&sessions)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse sessions"));
}

#[test]
fn perfect_simulation_maxes_recall() {
    let dir = TempDir::new().unwrap();
    let summary = simulate_json(
        dir.path(),
        &["--accuracy", "1.0", "--response-ms", "900", "--seed", "7"],
    );

    let games = summary["games"].as_array().unwrap();
    assert_eq!(games.len(), 4);
    assert_eq!(games[0]["kind"], "sequence_recall");
    assert_eq!(games[0]["score"], 100);
    assert_eq!(games[1]["score"], 100);
    assert_eq!(games[2]["correct"], 5);
    assert_eq!(summary["age"], 9);
    assert!(summary["classification"].is_null());
}

#[test]
fn same_seed_same_games() {
    let dir = TempDir::new().unwrap();
    let args = ["--accuracy", "0.5", "--seed", "42"];
    let first = simulate_json(dir.path(), &args);
    let second = simulate_json(dir.path(), &args);
    assert_eq!(first["games"], second["games"]);
    assert_ne!(first["id"], second["id"]);
}

#[test]
fn simulate_with_mock_classification() {
    let dir = TempDir::new().unwrap();
    let summary = simulate_json(
        dir.path(),
        &[
            "--accuracy",
            "1.0",
            "--response-ms",
            "900",
            "--seed",
            "3",
            "--classify",
            "--classifier",
            "mock",
        ],
    );

    let results = summary["classification"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[2]["skill"], "attention");
    assert_eq!(results[2]["outcome"]["level"], "Minimal Concern");
}

#[test]
fn simulate_markdown_and_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("reports").join("summary.json");

    cogbench(dir.path())
        .args(["simulate", "--age", "10", "--seed", "11", "--format", "markdown", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("## Assessment summary"))
        .stdout(predicate::str::contains("| Working Memory |"))
        .stderr(predicate::str::contains("Summary written to"));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(saved["games"].as_array().unwrap().len(), 4);
}

#[test]
fn simulate_records_to_ledger() {
    let dir = TempDir::new().unwrap();

    cogbench(dir.path())
        .args([
            "simulate",
            "--age",
            "9",
            "--accuracy",
            "1.0",
            "--response-ms",
            "900",
            "--seed",
            "5",
            "--grid",
            "4",
            "--record",
        ])
        .assert()
        .success();

    let ledger = std::fs::read_to_string(dir.path().join("cogbench-scores.json")).unwrap();
    assert!(ledger.contains("ankaraPatternScores"));
    assert!(ledger.contains("4x4"));
    assert!(ledger.contains("chameleon"));
    assert!(ledger.contains("phonics"));
}

#[test]
fn simulate_rejects_bad_grid() {
    let dir = TempDir::new().unwrap();
    cogbench(dir.path())
        .args(["simulate", "--age", "9", "--grid", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("grid size must be 3 or 4, got 5"));
}

#[test]
fn classify_with_mock() {
    let dir = TempDir::new().unwrap();
    cogbench(dir.path())
        .args([
            "classify",
            "--age",
            "9",
            "--working-memory",
            "80",
            "--attention",
            "60",
            "--classifier",
            "mock",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Working Memory: Average | Attention: Minimal Concern",
        ));
}

#[test]
fn classify_json_sends_only_nonzero_scores() {
    let dir = TempDir::new().unwrap();
    let output = cogbench(dir.path())
        .args([
            "classify",
            "--age",
            "12",
            "--processing-speed",
            "40",
            "--classifier",
            "mock",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["skill"], "processing_speed");
}

#[test]
fn classify_without_scores_fails() {
    let dir = TempDir::new().unwrap();
    cogbench(dir.path())
        .args(["classify", "--age", "9", "--classifier", "mock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter valid age"));
}

#[test]
fn classify_unknown_backend_fails() {
    let dir = TempDir::new().unwrap();
    cogbench(dir.path())
        .args(["classify", "--age", "9", "--attention", "50", "--classifier", "oracle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown classifier backend"));
}

#[test]
fn ledger_add_and_show() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.json");

    cogbench(dir.path())
        .args(["ledger", "add", "--mode", "3x3", "--score", "4", "--path"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 4 to 3x3"));

    cogbench(dir.path())
        .args(["ledger", "add", "--mode", "chameleon", "--score", "2", "--path"])
        .arg(&path)
        .assert()
        .success();

    cogbench(dir.path())
        .args(["ledger", "add", "--mode", "3x3", "--score", "0", "--path"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("not saved"));

    cogbench(dir.path())
        .args(["ledger", "show", "--path"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("3x3"))
        .stdout(predicate::str::contains("chameleon"));

    cogbench(dir.path())
        .args(["ledger", "show", "--mode", "3x3", "--path"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Best (3x3): 4"));

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("ankaraPatternScores"));
}

#[test]
fn ledger_show_empty_and_bad_mode() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.json");

    cogbench(dir.path())
        .args(["ledger", "show", "--path"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No scores saved"));

    cogbench(dir.path())
        .args(["ledger", "add", "--mode", "5x5", "--score", "3", "--path"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown mode"));
}
