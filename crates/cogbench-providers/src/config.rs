//! Configuration loading and classifier factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use cogbench_core::model::GridSize;
use cogbench_core::traits::Classifier;

use crate::http::{HttpClassifier, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::mock::MockClassifier;

/// Where classification requests go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// `"http"` or `"mock"`.
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_backend() -> String {
    "http".to_string()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Game tuning shared by every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Trials per game.
    #[serde(default = "default_max_trials")]
    pub max_trials: u32,
    /// Pause after a recall trial resolves.
    #[serde(default = "default_recall_settle")]
    pub recall_settle_ms: u64,
    #[serde(default = "default_stroop_settle")]
    pub stroop_settle_ms: u64,
    #[serde(default = "default_phonics_settle")]
    pub phonics_settle_ms: u64,
    /// Points lost by a late processing-speed answer.
    #[serde(default = "default_timeout_penalty")]
    pub timeout_penalty: f64,
    #[serde(default = "default_grid_size")]
    pub grid_size: GridSize,
}

fn default_max_trials() -> u32 {
    5
}
fn default_recall_settle() -> u64 {
    1200
}
fn default_stroop_settle() -> u64 {
    1200
}
fn default_phonics_settle() -> u64 {
    3000
}
fn default_timeout_penalty() -> f64 {
    15.0
}
fn default_grid_size() -> GridSize {
    GridSize::Three
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            max_trials: default_max_trials(),
            recall_settle_ms: default_recall_settle(),
            stroop_settle_ms: default_stroop_settle(),
            phonics_settle_ms: default_phonics_settle(),
            timeout_penalty: default_timeout_penalty(),
            grid_size: default_grid_size(),
        }
    }
}

/// Top-level cogbench configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CogbenchConfig {
    /// JSON file holding the score ledger.
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub assessment: AssessmentConfig,
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("./cogbench-scores.json")
}

impl Default for CogbenchConfig {
    fn default() -> Self {
        Self {
            ledger_path: default_ledger_path(),
            classifier: ClassifierConfig::default(),
            assessment: AssessmentConfig::default(),
        }
    }
}

impl CogbenchConfig {
    /// Pretty TOML of this config, as written by `cogbench init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    // Substituted values are copied as-is and never rescanned.
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `cogbench.toml` in the current directory
/// 2. `~/.config/cogbench/config.toml`
///
/// Environment variable override: `COGBENCH_CLASSIFIER_URL`.
pub fn load_config() -> Result<CogbenchConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<CogbenchConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("cogbench.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<CogbenchConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => CogbenchConfig::default(),
    };

    if let Ok(url) = std::env::var("COGBENCH_CLASSIFIER_URL") {
        config.classifier.base_url = url;
    }

    config.classifier.base_url = resolve_env_vars(&config.classifier.base_url);
    config.ledger_path = PathBuf::from(resolve_env_vars(&config.ledger_path.to_string_lossy()));

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("cogbench"))
}

/// Create a classifier from its configuration.
pub fn create_classifier(config: &ClassifierConfig) -> Result<Box<dyn Classifier>> {
    match config.backend.as_str() {
        "http" => Ok(Box::new(HttpClassifier::with_timeout(
            &config.base_url,
            config.timeout_secs,
        ))),
        "mock" => Ok(Box::new(MockClassifier::default())),
        other => anyhow::bail!("unknown classifier backend '{other}' (expected http or mock)"),
    }
}
