//! HTTP classifier talking to the `/predict/{skill}` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use cogbench_core::traits::{Classifier, Prediction, PredictionRequest};

use crate::error::ClassifierError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Classifier backed by the remote prediction service.
pub struct HttpClassifier {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpClassifier {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Self {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HttpClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// `{"Age": n, "<Skill>_Score": n}`
fn request_body(request: &PredictionRequest) -> Value {
    let mut body = Map::new();
    body.insert("Age".to_string(), json!(request.age));
    body.insert(request.skill.score_field().to_string(), json!(request.score));
    Value::Object(body)
}

#[async_trait]
impl Classifier for HttpClassifier {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, request), fields(skill = %request.skill, age = request.age))]
    async fn predict(&self, request: &PredictionRequest) -> anyhow::Result<Prediction> {
        let url = format!(
            "{}/predict/{}",
            self.base_url,
            request.skill.endpoint_slug()
        );

        let response = self
            .client
            .post(&url)
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    ClassifierError::NetworkError(format!(
                        "classification service not reachable at {}",
                        self.base_url
                    ))
                } else {
                    ClassifierError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::ApiError {
                status: status.as_u16(),
                message: body,
            }
            .into());
        }

        let prediction: Prediction = response
            .json()
            .await
            .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;

        debug!(predicted = prediction.predicted, "prediction received");
        Ok(prediction)
    }
}
