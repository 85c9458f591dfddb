//! Prediction result data structures

use crate::error::PredictorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmpowermentLabel {
    #[serde(rename = "Empowered")]
    Empowered,
    #[serde(rename = "Not Empowered")]
    NotEmpowered,
}

impl EmpowermentLabel {
    /// Map a class-1 probability to a label.
    ///
    /// Class 1 wins only when its probability is strictly above the threshold,
    /// so a 0.5 threshold reproduces the classifier's own `predict`.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability > threshold {
            EmpowermentLabel::Empowered
        } else {
            EmpowermentLabel::NotEmpowered
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmpowermentLabel::Empowered => "Empowered",
            EmpowermentLabel::NotEmpowered => "Not Empowered",
        }
    }
}

impl fmt::Display for EmpowermentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Submission identifier (caller-supplied or generated)
    pub submission_id: String,

    /// Predicted label
    pub label: EmpowermentLabel,

    /// Rendered sentence for display
    pub message: String,

    /// Class-1 probability reported by the model (0.0 - 1.0)
    pub probability: f64,

    /// Name of the model that produced the prediction
    pub model: String,

    /// Prediction timestamp
    pub timestamp: DateTime<Utc>,
}

impl PredictionResult {
    pub fn new(submission_id: String, probability: f64, threshold: f64, model: &str) -> Self {
        let label = EmpowermentLabel::from_probability(probability, threshold);
        Self {
            submission_id,
            label,
            message: Self::render(label),
            probability,
            model: model.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Text shown on the form page
    pub fn render(label: EmpowermentLabel) -> String {
        format!("Prediction: Women are {}.", label)
    }
}

/// Reply body sent back to the form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictionResponse {
    Ok(PredictionResult),
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        submission_id: Option<String>,
        kind: String,
        error: String,
    },
}

impl PredictionResponse {
    pub fn from_error(submission_id: Option<String>, err: &PredictorError) -> Self {
        PredictionResponse::Error {
            submission_id,
            kind: err.kind().to_string(),
            error: err.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, PredictionResponse::Ok(_))
    }

    /// Label, if the prediction succeeded
    pub fn label(&self) -> Option<EmpowermentLabel> {
        match self {
            PredictionResponse::Ok(result) => Some(result.label),
            PredictionResponse::Error { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_probability() {
        assert_eq!(
            EmpowermentLabel::from_probability(0.73, 0.5),
            EmpowermentLabel::Empowered
        );
        assert_eq!(
            EmpowermentLabel::from_probability(0.5, 0.5),
            EmpowermentLabel::NotEmpowered
        );
        assert_eq!(
            EmpowermentLabel::from_probability(0.1, 0.5),
            EmpowermentLabel::NotEmpowered
        );
    }

    #[test]
    fn test_rendered_message() {
        let result = PredictionResult::new("s1".to_string(), 0.9, 0.5, "logreg");
        assert_eq!(result.message, "Prediction: Women are Empowered.");

        let result = PredictionResult::new("s2".to_string(), 0.2, 0.5, "logreg");
        assert_eq!(result.message, "Prediction: Women are Not Empowered.");
    }

    #[test]
    fn test_response_wire_format() {
        let ok = PredictionResponse::Ok(PredictionResult::new(
            "s1".to_string(),
            0.8,
            0.5,
            "logreg",
        ));
        let json: serde_json::Value = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["label"], "Empowered");
        assert_eq!(json["submission_id"], "s1");

        let err = PredictionResponse::from_error(
            Some("s2".to_string()),
            &PredictorError::MissingField("Tariff Rates".to_string()),
        );
        let json: serde_json::Value = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["kind"], "missing_field");
        assert!(json["error"].as_str().unwrap().contains("Tariff Rates"));

        let parsed: PredictionResponse = serde_json::from_value(json).unwrap();
        assert!(!parsed.is_ok());
        assert_eq!(parsed.label(), None);
    }
}
