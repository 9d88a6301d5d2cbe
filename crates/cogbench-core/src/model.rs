//! Core data model types for cogbench.
//!
//! Session records are the immutable outcome of one trial; a scorer owns an
//! ordered list of them. `GameScores` carries the four sub-scores of one
//! assessment pass.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four cognitive sub-skills an assessment produces a score for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    WorkingMemory,
    ProcessingSpeed,
    Attention,
    AuditoryProcessing,
}

impl Skill {
    /// Fixed order in which the games are played and results are listed.
    pub const ALL: [Skill; 4] = [
        Skill::WorkingMemory,
        Skill::ProcessingSpeed,
        Skill::Attention,
        Skill::AuditoryProcessing,
    ];

    /// Path segment of the prediction endpoint for this skill.
    pub fn endpoint_slug(&self) -> &'static str {
        match self {
            Skill::WorkingMemory => "working-memory",
            Skill::ProcessingSpeed => "processing-speed",
            Skill::Attention => "attention",
            Skill::AuditoryProcessing => "auditory-processing",
        }
    }

    /// JSON key carrying the score in a prediction request body.
    pub fn score_field(&self) -> &'static str {
        match self {
            Skill::WorkingMemory => "WorkingMemory_Score",
            Skill::ProcessingSpeed => "ProcessingSpeed_Score",
            Skill::Attention => "Attention_Score",
            Skill::AuditoryProcessing => "AuditoryProcessing_Score",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skill::WorkingMemory => write!(f, "Working Memory"),
            Skill::ProcessingSpeed => write!(f, "Processing Speed"),
            Skill::Attention => write!(f, "Attention"),
            Skill::AuditoryProcessing => write!(f, "Auditory Processing"),
        }
    }
}

impl FromStr for Skill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "working_memory" | "wm" => Ok(Skill::WorkingMemory),
            "processing_speed" | "ps" => Ok(Skill::ProcessingSpeed),
            "attention" | "stroop" => Ok(Skill::Attention),
            "auditory_processing" | "auditory" | "phonics" => Ok(Skill::AuditoryProcessing),
            other => Err(format!("unknown skill: {other}")),
        }
    }
}

/// The game types of the suite. Each one feeds exactly one sub-skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    SequenceRecall,
    TimedRecall,
    Stroop,
    Phonics,
}

impl GameKind {
    pub fn skill(&self) -> Skill {
        match self {
            GameKind::SequenceRecall => Skill::WorkingMemory,
            GameKind::TimedRecall => Skill::ProcessingSpeed,
            GameKind::Stroop => Skill::Attention,
            GameKind::Phonics => Skill::AuditoryProcessing,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::SequenceRecall => write!(f, "sequence recall"),
            GameKind::TimedRecall => write!(f, "timed recall"),
            GameKind::Stroop => write!(f, "chameleon colors"),
            GameKind::Phonics => write!(f, "sound spelling"),
        }
    }
}

/// Side length of the recall grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GridSize {
    Three,
    Four,
}

impl GridSize {
    pub fn side(&self) -> u8 {
        match self {
            GridSize::Three => 3,
            GridSize::Four => 4,
        }
    }

    /// Number of cells a sequence step is drawn from.
    pub fn cells(&self) -> usize {
        let side = self.side() as usize;
        side * side
    }
}

impl TryFrom<u8> for GridSize {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(GridSize::Three),
            4 => Ok(GridSize::Four),
            other => Err(format!("grid size must be 3 or 4, got {other}")),
        }
    }
}

impl From<GridSize> for u8 {
    fn from(size: GridSize) -> Self {
        size.side()
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.side())
    }
}

/// The five Stroop colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Purple,
    ];

    /// Display value of the ink.
    pub fn hex(&self) -> &'static str {
        match self {
            Color::Red => "#EF4444",
            Color::Blue => "#3B82F6",
            Color::Green => "#22C55E",
            Color::Yellow => "#EAB308",
            Color::Purple => "#A855F7",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "RED",
            Color::Blue => "BLUE",
            Color::Green => "GREEN",
            Color::Yellow => "YELLOW",
            Color::Purple => "PURPLE",
        };
        f.write_str(name)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "RED" => Ok(Color::Red),
            "BLUE" => Ok(Color::Blue),
            "GREEN" => Ok(Color::Green),
            "YELLOW" => Ok(Color::Yellow),
            "PURPLE" => Ok(Color::Purple),
            other => Err(format!("unknown color: {other}")),
        }
    }
}

/// Outcome of one untimed sequence-recall trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallSession {
    /// 1-based index within the run.
    pub trial_number: u32,
    pub grid_size: GridSize,
    pub sequence_length: usize,
    pub success: bool,
    /// Always 1: a trial gets no retry.
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Rounds played so far including this one.
    pub total_rounds: u32,
    #[serde(default)]
    pub response_time_ms: u64,
}

/// Outcome of one time-boxed sequence-recall trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedRecallSession {
    pub trial_number: u32,
    pub grid_size: GridSize,
    pub sequence_length: usize,
    pub success: bool,
    /// False once the countdown reached zero before the response resolved.
    pub completed_on_time: bool,
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    pub total_rounds: u32,
    #[serde(default)]
    pub response_time_ms: u64,
    /// Countdown length drawn for this trial.
    pub allowed_time_ms: u64,
}

/// Outcome of one Stroop trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionSession {
    pub trial_number: u32,
    pub is_congruent: bool,
    pub word_shown: Color,
    pub ink_color: Color,
    pub selected_color: Color,
    pub is_correct: bool,
    pub response_time_ms: u64,
}

/// Outcome of one phonics spelling trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellingSession {
    pub trial_number: u32,
    pub word: String,
    pub user_spelling: String,
    pub is_correct: bool,
    /// 0-1, how close the spelling was.
    pub partial_credit: f64,
    pub response_time_ms: u64,
    /// 0-1, supplied by the game, not recomputed by the scorer.
    pub phoneme_accuracy: f64,
}

fn default_attempts() -> u32 {
    1
}

/// The four sub-scores of one assessment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScores {
    pub working_memory: u32,
    pub processing_speed: u32,
    pub attention: u32,
    pub auditory_processing: u32,
}

impl GameScores {
    pub fn get(&self, skill: Skill) -> u32 {
        match skill {
            Skill::WorkingMemory => self.working_memory,
            Skill::ProcessingSpeed => self.processing_speed,
            Skill::Attention => self.attention,
            Skill::AuditoryProcessing => self.auditory_processing,
        }
    }

    pub fn set(&mut self, skill: Skill, score: u32) {
        let slot = match skill {
            Skill::WorkingMemory => &mut self.working_memory,
            Skill::ProcessingSpeed => &mut self.processing_speed,
            Skill::Attention => &mut self.attention,
            Skill::AuditoryProcessing => &mut self.auditory_processing,
        };
        *slot = score;
    }

    /// True when every sub-score is above zero.
    pub fn all_populated(&self) -> bool {
        Skill::ALL.iter().all(|s| self.get(*s) > 0)
    }

    pub fn any_populated(&self) -> bool {
        Skill::ALL.iter().any(|s| self.get(*s) > 0)
    }

    /// `(skill, score)` pairs in game order.
    pub fn iter(&self) -> impl Iterator<Item = (Skill, u32)> + '_ {
        Skill::ALL.iter().map(move |s| (*s, self.get(*s)))
    }
}
