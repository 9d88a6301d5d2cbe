//! Mock classifier for tests and offline runs.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use cogbench_core::model::Skill;
use cogbench_core::traits::{Classifier, Prediction, PredictionRequest};

use crate::error::ClassifierError;

/// A classifier that answers from a table instead of the network.
///
/// Skills without an entry get the default prediction; skills marked as
/// failing return an API error.
pub struct MockClassifier {
    predictions: HashMap<Skill, i64>,
    default_prediction: i64,
    failing: HashSet<Skill>,
    call_count: AtomicU32,
    requests: Mutex<Vec<PredictionRequest>>,
}

impl MockClassifier {
    pub fn new(predictions: HashMap<Skill, i64>) -> Self {
        Self {
            predictions,
            default_prediction: 3,
            failing: HashSet::new(),
            call_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every skill gets the same level index.
    pub fn with_fixed_prediction(predicted: i64) -> Self {
        let mut mock = Self::new(HashMap::new());
        mock.default_prediction = predicted;
        mock
    }

    pub fn failing_for(mut self, skill: Skill) -> Self {
        self.failing.insert(skill);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<PredictionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn predict(&self, request: &PredictionRequest) -> anyhow::Result<Prediction> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(*request);
        }

        if self.failing.contains(&request.skill) {
            return Err(ClassifierError::ApiError {
                status: 500,
                message: format!("mock failure for {}", request.skill),
            }
            .into());
        }

        let predicted = self
            .predictions
            .get(&request.skill)
            .copied()
            .unwrap_or(self.default_prediction);
        Ok(Prediction { predicted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogbench_core::classification::{classify_scores, ClassificationOutcome};
    use cogbench_core::model::GameScores;

    #[tokio::test]
    async fn fixed_prediction() {
        let mock = MockClassifier::with_fixed_prediction(1);
        let request = PredictionRequest {
            skill: Skill::ProcessingSpeed,
            age: 9,
            score: 40,
        };
        let prediction = mock.predict(&request).await.unwrap();
        assert_eq!(prediction.predicted, 1);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.requests(), vec![request]);
    }

    #[tokio::test]
    async fn only_non_zero_scores_are_sent() {
        let mock = MockClassifier::new(HashMap::from([(Skill::Attention, 3)]));
        let mut scores = GameScores::default();
        scores.set(Skill::Attention, 100);
        scores.set(Skill::AuditoryProcessing, 45);

        let report = classify_scores(&mock, 6, &scores).await.unwrap();
        assert_eq!(mock.call_count(), 2);
        assert_eq!(
            report.summary(),
            "Attention: Minimal Concern | Auditory Processing: Average"
        );
        let attention = mock
            .requests()
            .into_iter()
            .find(|r| r.skill == Skill::Attention)
            .unwrap();
        assert_eq!(attention.score, 0);
    }

    #[tokio::test]
    async fn failing_skill_reports_error() {
        let mock = MockClassifier::with_fixed_prediction(9).failing_for(Skill::WorkingMemory);
        let mut scores = GameScores::default();
        scores.set(Skill::WorkingMemory, 70);
        scores.set(Skill::ProcessingSpeed, 70);

        let report = classify_scores(&mock, 11, &scores).await.unwrap();
        assert!(report.has_errors());
        assert_eq!(
            report.get(Skill::WorkingMemory).unwrap().outcome,
            ClassificationOutcome::Error
        );
        assert_eq!(
            report.get(Skill::ProcessingSpeed).unwrap().outcome,
            ClassificationOutcome::Level("Unknown".to_string())
        );
    }
}
