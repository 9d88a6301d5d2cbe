//! cogbench CLI, the command-line front end over the assessment crates.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "cogbench",
    version,
    about = "Cognitive assessment games, scoring and classification"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play all four games headlessly with a scripted participant
    Simulate {
        /// Participant age in years
        #[arg(long)]
        age: u32,

        /// Recall grid side length (3 or 4), overrides the config
        #[arg(long)]
        grid: Option<u8>,

        /// Probability of answering a trial correctly (0.0-1.0)
        #[arg(long, default_value = "0.8")]
        accuracy: f64,

        /// Thinking time before each answer, in milliseconds
        #[arg(long, default_value = "1500")]
        response_ms: u64,

        /// Seed for trials and participant; random when omitted
        #[arg(long)]
        seed: Option<u64>,

        /// Classify the sub-scores once all games are done
        #[arg(long)]
        classify: bool,

        /// Classifier backend override: http or mock
        #[arg(long)]
        classifier: Option<String>,

        /// Save each game's correct count to the score ledger
        #[arg(long)]
        record: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Also write the summary JSON here
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a JSON array of recorded sessions
    Score {
        /// Game the sessions come from: recall, timed, stroop, phonics
        #[arg(long)]
        game: String,

        /// Path to the sessions JSON file
        #[arg(long)]
        sessions: PathBuf,

        /// Trials per game used for the per-trial point value
        #[arg(long, default_value = "5")]
        max_trials: u32,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Classify sub-scores through the configured classifier
    Classify {
        /// Participant age in years
        #[arg(long)]
        age: u32,

        #[arg(long, default_value = "0")]
        working_memory: u32,

        #[arg(long, default_value = "0")]
        processing_speed: u32,

        #[arg(long, default_value = "0")]
        attention: u32,

        #[arg(long, default_value = "0")]
        auditory: u32,

        /// Classifier backend override: http or mock
        #[arg(long)]
        classifier: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Inspect or add to the local score ledger
    Ledger {
        #[command(subcommand)]
        action: LedgerAction,

        /// Ledger file, overrides the config
        #[arg(long, global = true)]
        path: Option<PathBuf>,

        /// Config file path
        #[arg(long, global = true)]
        config: Option<PathBuf>,
    },

    /// Create a starter cogbench.toml
    Init,
}

#[derive(Subcommand)]
pub enum LedgerAction {
    /// List stored scores, or best and recent for one mode
    Show {
        /// 3x3, 4x4, chameleon or phonics
        #[arg(long)]
        mode: Option<String>,
    },

    /// Save a score as if a game had just been reset
    Add {
        #[arg(long)]
        mode: String,

        #[arg(long)]
        score: u32,
    },
}

#[tokio::main]
async fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "cogbench=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            age,
            grid,
            accuracy,
            response_ms,
            seed,
            classify,
            classifier,
            record,
            format,
            output,
            config,
        } => {
            commands::simulate::execute(commands::simulate::SimulateArgs {
                age,
                grid,
                accuracy,
                response_ms,
                seed,
                classify,
                classifier,
                record,
                format,
                output,
                config,
            })
            .await
        }
        Commands::Score {
            game,
            sessions,
            max_trials,
            format,
        } => commands::score::execute(game, sessions, max_trials, format),
        Commands::Classify {
            age,
            working_memory,
            processing_speed,
            attention,
            auditory,
            classifier,
            format,
            config,
        } => {
            commands::classify::execute(
                age,
                [working_memory, processing_speed, attention, auditory],
                classifier,
                format,
                config,
            )
            .await
        }
        Commands::Ledger {
            action,
            path,
            config,
        } => commands::ledger::execute(action, path, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
