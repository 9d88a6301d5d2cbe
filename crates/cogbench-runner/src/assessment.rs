//! Assessment aggregator: walks the participant through the games in a fixed
//! order, keeps the four sub-scores and decides when to classify them.

use std::fmt;

use cogbench_core::classification::{classify_scores, ClassificationReport};
use cogbench_core::error::AssessmentError;
use cogbench_core::model::{GameScores, Skill};
use cogbench_core::traits::Classifier;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Which game the participant is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentPhase {
    WorkingMemory,
    ProcessingSpeed,
    Attention,
    AuditoryProcessing,
    Completed,
}

impl AssessmentPhase {
    fn for_skill(skill: Skill) -> Self {
        match skill {
            Skill::WorkingMemory => AssessmentPhase::WorkingMemory,
            Skill::ProcessingSpeed => AssessmentPhase::ProcessingSpeed,
            Skill::Attention => AssessmentPhase::Attention,
            Skill::AuditoryProcessing => AssessmentPhase::AuditoryProcessing,
        }
    }

    /// Skill being measured, `None` once completed.
    pub fn skill(&self) -> Option<Skill> {
        match self {
            AssessmentPhase::WorkingMemory => Some(Skill::WorkingMemory),
            AssessmentPhase::ProcessingSpeed => Some(Skill::ProcessingSpeed),
            AssessmentPhase::Attention => Some(Skill::Attention),
            AssessmentPhase::AuditoryProcessing => Some(Skill::AuditoryProcessing),
            AssessmentPhase::Completed => None,
        }
    }
}

impl fmt::Display for AssessmentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.skill() {
            Some(skill) => write!(f, "{skill}"),
            None => f.write_str("completed"),
        }
    }
}

/// One participant's pass through the four games.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    age: Option<u32>,
    scores: GameScores,
    recorded: Vec<Skill>,
    phase: AssessmentPhase,
    auto_classified: bool,
}

impl Assessment {
    pub fn new() -> Self {
        Self {
            age: None,
            scores: GameScores::default(),
            recorded: Vec::new(),
            phase: AssessmentPhase::WorkingMemory,
            auto_classified: false,
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.set_age(age);
        self
    }

    pub fn set_age(&mut self, age: u32) {
        self.age = (age > 0).then_some(age);
    }

    pub fn age(&self) -> Option<u32> {
        self.age
    }

    pub fn phase(&self) -> AssessmentPhase {
        self.phase
    }

    pub fn scores(&self) -> &GameScores {
        &self.scores
    }

    pub fn is_recorded(&self, skill: Skill) -> bool {
        self.recorded.contains(&skill)
    }

    /// Store a game's final score. Each skill is written once per pass.
    ///
    /// The phase moves to the first skill, in game order, still missing.
    pub fn record(&mut self, skill: Skill, score: u32) -> Result<AssessmentPhase, AssessmentError> {
        if score > 100 {
            return Err(AssessmentError::OutOfRange(score));
        }
        if self.is_recorded(skill) {
            return Err(AssessmentError::AlreadyRecorded(skill));
        }

        self.scores.set(skill, score);
        self.recorded.push(skill);
        self.phase = Skill::ALL
            .iter()
            .find(|s| !self.recorded.contains(s))
            .map(|s| AssessmentPhase::for_skill(*s))
            .unwrap_or(AssessmentPhase::Completed);

        info!(skill = %skill, score, next = %self.phase, "sub-score recorded");
        Ok(self.phase)
    }

    /// Every game done, every score above zero and an age entered.
    pub fn ready_for_classification(&self) -> bool {
        self.phase == AssessmentPhase::Completed
            && self.scores.all_populated()
            && self.age.is_some()
    }

    /// True exactly once per pass, the first time the assessment is ready.
    pub fn take_auto_classification(&mut self) -> bool {
        if self.auto_classified || !self.ready_for_classification() {
            return false;
        }
        self.auto_classified = true;
        debug!("auto classification triggered");
        true
    }

    /// Classify whatever sub-scores are non-zero.
    pub async fn classify(
        &self,
        classifier: &dyn Classifier,
    ) -> Result<ClassificationReport, AssessmentError> {
        classify_scores(classifier, self.age.unwrap_or(0), &self.scores).await
    }

    /// Start a new pass. The age is kept.
    pub fn reset(&mut self) {
        self.scores = GameScores::default();
        self.recorded.clear();
        self.phase = AssessmentPhase::WorkingMemory;
        self.auto_classified = false;
        debug!("assessment reset");
    }
}

impl Default for Assessment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use cogbench_core::classification::ClassificationOutcome;
    use cogbench_core::traits::{Prediction, PredictionRequest};

    use super::*;

    struct CountingClassifier {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Classifier for CountingClassifier {
        fn name(&self) -> &str {
            "counting"
        }

        async fn predict(&self, request: &PredictionRequest) -> anyhow::Result<Prediction> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(Prediction {
                predicted: if request.skill == Skill::Attention { 0 } else { 4 },
            })
        }
    }

    fn complete(assessment: &mut Assessment) {
        for (skill, score) in Skill::ALL.into_iter().zip([80, 60, 40, 70]) {
            assessment.record(skill, score).unwrap();
        }
    }

    #[test]
    fn phases_follow_game_order() {
        let mut a = Assessment::new().with_age(8);
        assert_eq!(a.phase(), AssessmentPhase::WorkingMemory);
        assert_eq!(
            a.record(Skill::WorkingMemory, 80).unwrap(),
            AssessmentPhase::ProcessingSpeed
        );
        assert_eq!(
            a.record(Skill::ProcessingSpeed, 60).unwrap(),
            AssessmentPhase::Attention
        );
        assert_eq!(
            a.record(Skill::Attention, 40).unwrap(),
            AssessmentPhase::AuditoryProcessing
        );
        assert_eq!(
            a.record(Skill::AuditoryProcessing, 70).unwrap(),
            AssessmentPhase::Completed
        );
        assert_eq!(a.scores().get(Skill::Attention), 40);
    }

    #[test]
    fn a_score_is_written_once_per_pass() {
        let mut a = Assessment::new();
        a.record(Skill::Attention, 60).unwrap();
        assert_eq!(
            a.record(Skill::Attention, 90),
            Err(AssessmentError::AlreadyRecorded(Skill::Attention))
        );
        assert_eq!(a.scores().get(Skill::Attention), 60);
        // out of order recording leaves the phase on the first missing game
        assert_eq!(a.phase(), AssessmentPhase::WorkingMemory);
    }

    #[test]
    fn out_of_range_rejected() {
        let mut a = Assessment::new();
        assert_eq!(
            a.record(Skill::WorkingMemory, 101),
            Err(AssessmentError::OutOfRange(101))
        );
        assert!(!a.is_recorded(Skill::WorkingMemory));
    }

    #[test]
    fn auto_classification_fires_once() {
        let mut a = Assessment::new().with_age(7);
        assert!(!a.take_auto_classification());
        complete(&mut a);
        assert!(a.take_auto_classification());
        assert!(!a.take_auto_classification());

        a.reset();
        assert_eq!(a.age(), Some(7));
        assert_eq!(a.phase(), AssessmentPhase::WorkingMemory);
        assert!(!a.scores().any_populated());
        complete(&mut a);
        assert!(a.take_auto_classification());
    }

    #[test]
    fn zero_score_or_missing_age_blocks_auto_classification() {
        let mut a = Assessment::new().with_age(7);
        for skill in Skill::ALL {
            let score = if skill == Skill::Attention { 0 } else { 50 };
            a.record(skill, score).unwrap();
        }
        assert_eq!(a.phase(), AssessmentPhase::Completed);
        assert!(!a.ready_for_classification());

        let mut no_age = Assessment::new();
        complete(&mut no_age);
        assert!(!no_age.ready_for_classification());
        no_age.set_age(0);
        assert_eq!(no_age.age(), None);
    }

    #[tokio::test]
    async fn classify_delegates_per_skill() {
        let classifier = CountingClassifier {
            calls: AtomicU32::new(0),
        };
        let mut a = Assessment::new().with_age(9);
        complete(&mut a);

        let report = a.classify(&classifier).await.unwrap();
        assert_eq!(classifier.calls.load(Ordering::Relaxed), 4);
        assert_eq!(
            report.get(Skill::Attention).unwrap().outcome,
            ClassificationOutcome::Level("Significant Concern".to_string())
        );
        assert_eq!(
            report.get(Skill::WorkingMemory).unwrap().outcome,
            ClassificationOutcome::Level("Above Average".to_string())
        );
    }

    #[tokio::test]
    async fn manual_classification_without_scores_is_refused() {
        let classifier = CountingClassifier {
            calls: AtomicU32::new(0),
        };
        let a = Assessment::new().with_age(9);
        assert_eq!(
            a.classify(&classifier).await.unwrap_err(),
            AssessmentError::NothingToClassify
        );
        assert_eq!(classifier.calls.load(Ordering::Relaxed), 0);
    }
}
