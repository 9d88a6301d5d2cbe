//! The `cogbench classify` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use cogbench_core::classification::wire_score;
use cogbench_core::{classify_scores, GameScores, Skill};
use cogbench_providers::config::load_config_from;
use cogbench_providers::create_classifier;

pub async fn execute(
    age: u32,
    scores: [u32; 4],
    classifier: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(backend) = classifier {
        config.classifier.backend = backend;
    }

    let mut game_scores = GameScores::default();
    for (skill, score) in Skill::ALL.iter().zip(scores) {
        if score > 100 {
            anyhow::bail!("{skill} score must be 0-100, got {score}");
        }
        game_scores.set(*skill, score);
    }

    let classifier = create_classifier(&config.classifier)?;
    let report = classify_scores(classifier.as_ref(), age, &game_scores)
        .await
        .context("classification not attempted")?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => {
            let mut table = Table::new();
            table.set_header(vec!["Skill", "Score", "Sent", "Level"]);
            for r in &report.results {
                table.add_row(vec![
                    Cell::new(r.skill),
                    Cell::new(r.score),
                    Cell::new(wire_score(r.skill, r.score)),
                    Cell::new(&r.outcome),
                ]);
            }
            println!("{table}");
            println!("{}", report.summary());
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    if report.has_errors() {
        eprintln!("Some skills could not be classified; see the Error entries above.");
    }
    Ok(())
}
