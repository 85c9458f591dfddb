//! Predictor form handler: form values in, rendered label out.

use crate::config::AppConfig;
use crate::encoding::CategoryEncoder;
use crate::error::{PredictorError, Result};
use crate::feature_extractor::FeatureExtractor;
use crate::form::FormSchema;
use crate::models::InferenceEngine;
use crate::scaling::NumericScaler;
use crate::types::{FormSubmission, PredictionResponse, PredictionResult};
use tracing::{debug, error, info, warn};

/// Validates a submission, builds its feature vector and classifies it.
pub struct PredictorFormHandler {
    extractor: FeatureExtractor,
    engine: InferenceEngine,
    schema: FormSchema,
}

impl PredictorFormHandler {
    /// Build the handler from configuration, loading the category table and
    /// the model artifact.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let encoder = match &config.categories.path {
            Some(path) => CategoryEncoder::from_json_file(path)?,
            None => CategoryEncoder::new(),
        };
        let extractor =
            FeatureExtractor::with_parts(encoder, NumericScaler::new(config.scaling.clone()));
        let engine = InferenceEngine::new(config, &extractor.feature_names())?;
        Ok(Self::new(extractor, engine))
    }

    pub fn new(extractor: FeatureExtractor, engine: InferenceEngine) -> Self {
        let schema = FormSchema::build(extractor.encoder());
        Self {
            extractor,
            engine,
            schema,
        }
    }

    /// Classify a decoded submission
    pub fn handle(&self, submission: &FormSubmission) -> Result<PredictionResult> {
        let submission_id = submission
            .submission_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let features = self.extractor.extract(submission)?;
        debug!(
            submission_id = %submission_id,
            features = ?features,
            "Feature vector assembled"
        );

        let result = self.engine.predict(submission_id, &features)?;
        info!(
            submission_id = %result.submission_id,
            label = %result.label,
            probability = result.probability,
            "Prediction complete"
        );
        Ok(result)
    }

    /// Decode a JSON payload and classify it. Failures become error replies.
    pub fn handle_payload(&self, payload: &[u8]) -> PredictionResponse {
        let submission: FormSubmission = match serde_json::from_slice(payload) {
            Ok(submission) => submission,
            Err(e) => {
                let err = PredictorError::from(e);
                warn!(error = %err, "Failed to deserialize submission");
                return PredictionResponse::from_error(None, &err);
            }
        };

        match self.handle(&submission) {
            Ok(result) => PredictionResponse::Ok(result),
            Err(err) if err.is_client_error() => {
                warn!(
                    submission_id = ?submission.submission_id,
                    kind = err.kind(),
                    error = %err,
                    "Submission rejected"
                );
                PredictionResponse::from_error(submission.submission_id.clone(), &err)
            }
            Err(err) => {
                error!(
                    submission_id = ?submission.submission_id,
                    kind = err.kind(),
                    error = %err,
                    "Prediction failed"
                );
                PredictionResponse::from_error(submission.submission_id.clone(), &err)
            }
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }
}
