//! Inference engine wrapping the loaded classifier

use crate::config::AppConfig;
use crate::error::{PredictorError, Result};
use crate::models::loader::ModelLoader;
use crate::models::Classifier;
use crate::types::PredictionResult;
use std::sync::Arc;
use tracing::{debug, info};

/// Runs the classifier on feature vectors and maps scores to labels
pub struct InferenceEngine {
    /// Loaded model, read-only for the process lifetime
    model: Arc<dyn Classifier>,
    /// Feature count produced by the extractor
    feature_count: usize,
    /// Class-1 probability threshold
    threshold: f64,
}

impl InferenceEngine {
    /// Load the configured model and check it against the extractor's features
    pub fn new(config: &AppConfig, feature_names: &[&str]) -> anyhow::Result<Self> {
        let loader = ModelLoader::with_threads(config.model.onnx_threads);
        let model = loader.load(&config.model.path)?;
        Self::with_model(model, feature_names, config.model.threshold)
    }

    /// Create an engine around an already loaded model.
    ///
    /// Fails when the model declares a different input size, or records
    /// feature names that differ from `feature_names` in content or order.
    pub fn with_model(
        model: Arc<dyn Classifier>,
        feature_names: &[&str],
        threshold: f64,
    ) -> anyhow::Result<Self> {
        let feature_count = feature_names.len();
        if let Some(dim) = model.input_dim() {
            if dim != feature_count {
                anyhow::bail!(
                    "Model '{}' expects {} features but the form produces {}",
                    model.name(),
                    dim,
                    feature_count
                );
            }
        }

        if let Some(trained) = model.feature_names() {
            let mismatch = trained
                .iter()
                .zip(feature_names)
                .position(|(expected, produced)| expected != produced);
            if let Some(i) = mismatch {
                anyhow::bail!(
                    "Model '{}' expects feature {} to be '{}' but the form produces '{}'",
                    model.name(),
                    i,
                    trained[i],
                    feature_names[i]
                );
            }
        }

        info!(
            model = %model.name(),
            feature_count = feature_count,
            threshold = threshold,
            "Inference engine initialized"
        );

        Ok(Self {
            model,
            feature_count,
            threshold,
        })
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Class-1 probability for one feature vector
    pub fn predict_proba(&self, features: &[f32]) -> Result<f64> {
        if features.len() != self.feature_count {
            return Err(PredictorError::DimensionMismatch {
                expected: self.feature_count,
                actual: features.len(),
            });
        }

        let prob = self
            .model
            .predict_proba(features)
            .map_err(|e| PredictorError::Inference(e.to_string()))?;

        if !(0.0..=1.0).contains(&prob) {
            return Err(PredictorError::Inference(format!(
                "model returned probability {} outside [0, 1]",
                prob
            )));
        }

        debug!(model = %self.model.name(), probability = prob, "Inference complete");
        Ok(prob)
    }

    /// Run inference and build the labelled result
    pub fn predict(&self, submission_id: String, features: &[f32]) -> Result<PredictionResult> {
        let prob = self.predict_proba(features)?;
        Ok(PredictionResult::new(
            submission_id,
            prob,
            self.threshold,
            self.model.name(),
        ))
    }
}
