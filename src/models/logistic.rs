//! Logistic regression evaluated from an exported coefficient file.
//!
//! The artifact is a JSON document:
//!
//! ```json
//! {
//!   "name": "logistic_regression",
//!   "feature_names": ["Business Ownership", "..."],
//!   "coefficients": [0.42, "..."],
//!   "intercept": -0.17
//! }
//! ```

use super::Classifier;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Binary logistic regression: `p = sigmoid(w · x + b)`
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticModel {
    #[serde(default = "default_name")]
    name: String,
    /// Feature names recorded at export time
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// One weight per input feature
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

fn default_name() -> String {
    "logistic_regression".to_string()
}

impl LogisticModel {
    pub fn new(name: &str, coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            name: name.to_string(),
            feature_names: None,
            coefficients,
            intercept,
        }
    }

    /// Load a coefficient file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model from {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse model from {}", path.display()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let model: LogisticModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            anyhow::bail!("model has no coefficients");
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.coefficients.len() {
                anyhow::bail!(
                    "model lists {} feature names but {} coefficients",
                    names.len(),
                    self.coefficients.len()
                );
            }
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            anyhow::bail!("model parameters must be finite");
        }
        Ok(())
    }

    /// Raw linear score `w · x + b`
    pub fn decision_function(&self, features: &[f32]) -> f64 {
        self.coefficients
            .iter()
            .zip(features)
            .map(|(&w, &x)| w * x as f64)
            .sum::<f64>()
            + self.intercept
    }
}

/// Logistic function, stable for large magnitudes
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict_proba(&self, features: &[f32]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            anyhow::bail!(
                "expected {} features, got {}",
                self.coefficients.len(),
                features.len()
            );
        }
        Ok(sigmoid(self.decision_function(features)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(40.0) > 0.999);
        assert!(sigmoid(-40.0) < 0.001);
        assert!(sigmoid(-1000.0).is_finite());
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_predict_proba() {
        let model = LogisticModel::new("test", vec![1.0, -2.0], 0.5);

        // 1*1 - 2*0.25 + 0.5 = 1.0
        assert!((model.decision_function(&[1.0, 0.25]) - 1.0).abs() < 1e-9);
        let p = model.predict_proba(&[1.0, 0.25]).unwrap();
        assert!((p - sigmoid(1.0)).abs() < 1e-12);

        assert!(model.predict_proba(&[1.0]).is_err());
        assert_eq!(model.input_dim(), Some(2));
    }

    #[test]
    fn test_parse_artifact() {
        let model = LogisticModel::from_json_str(
            r#"{"feature_names": ["a", "b"], "coefficients": [0.1, 0.2], "intercept": 0.0}"#,
        )
        .unwrap();
        assert_eq!(model.name(), "logistic_regression");
        assert_eq!(model.coefficients.len(), 2);
        assert_eq!(
            Classifier::feature_names(&model),
            Some(&["a".to_string(), "b".to_string()][..])
        );

        assert!(LogisticModel::from_json_str(r#"{"coefficients": [], "intercept": 0.0}"#).is_err());
        assert!(LogisticModel::from_json_str(
            r#"{"feature_names": ["a"], "coefficients": [0.1, 0.2], "intercept": 0.0}"#
        )
        .is_err());
    }
}
