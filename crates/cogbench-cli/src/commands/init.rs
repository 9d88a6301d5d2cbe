//! The `cogbench init` command.

use anyhow::Result;

use cogbench_providers::CogbenchConfig;

pub fn execute() -> Result<()> {
    if std::path::Path::new("cogbench.toml").exists() {
        println!("cogbench.toml already exists, skipping.");
    } else {
        let config = CogbenchConfig::default().to_toml()?;
        std::fs::write("cogbench.toml", format!("{CONFIG_HEADER}{config}"))?;
        println!("Created cogbench.toml");
    }

    std::fs::create_dir_all("sessions")?;
    let example_path = std::path::Path::new("sessions/example-stroop.json");
    if example_path.exists() {
        println!("sessions/example-stroop.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_STROOP_SESSIONS)?;
        println!("Created sessions/example-stroop.json");
    }

    println!("\nNext steps:");
    println!("  1. Point [classifier] base_url at your prediction service");
    println!("  2. Run: cogbench score --game stroop --sessions sessions/example-stroop.json");
    println!("  3. Run: cogbench simulate --age 9 --classify");

    Ok(())
}

const CONFIG_HEADER: &str = "# cogbench configuration
#
# base_url may reference environment variables as ${VAR}.
# COGBENCH_CLASSIFIER_URL overrides it at runtime.

";

const EXAMPLE_STROOP_SESSIONS: &str = r#"[
  {
    "trial_number": 1,
    "is_congruent": true,
    "word_shown": "RED",
    "ink_color": "RED",
    "selected_color": "RED",
    "is_correct": true,
    "response_time_ms": 820
  },
  {
    "trial_number": 2,
    "is_congruent": false,
    "word_shown": "BLUE",
    "ink_color": "GREEN",
    "selected_color": "GREEN",
    "is_correct": true,
    "response_time_ms": 1340
  },
  {
    "trial_number": 3,
    "is_congruent": false,
    "word_shown": "YELLOW",
    "ink_color": "PURPLE",
    "selected_color": "YELLOW",
    "is_correct": false,
    "response_time_ms": 990
  },
  {
    "trial_number": 4,
    "is_congruent": true,
    "word_shown": "GREEN",
    "ink_color": "GREEN",
    "selected_color": "GREEN",
    "is_correct": true,
    "response_time_ms": 760
  },
  {
    "trial_number": 5,
    "is_congruent": false,
    "word_shown": "RED",
    "ink_color": "BLUE",
    "selected_color": "BLUE",
    "is_correct": true,
    "response_time_ms": 1210
  }
]
"#;
