//! Feature extraction for empowerment model inference.
//!
//! Turns a raw form submission into the feature vector the classifier was
//! trained on: the scaled numeric inputs first, then the encoded categorical
//! answers in category-table order.

use crate::encoding::CategoryEncoder;
use crate::error::{PredictorError, Result};
use crate::scaling::NumericScaler;
use crate::types::{FormSubmission, NumericField};

/// Feature extractor that transforms form submissions into model input features.
pub struct FeatureExtractor {
    encoder: CategoryEncoder,
    scaler: NumericScaler,
}

impl FeatureExtractor {
    /// Create a feature extractor with the built-in category table and
    /// default scaling parameters.
    pub fn new() -> Self {
        Self::with_parts(CategoryEncoder::new(), NumericScaler::default())
    }

    pub fn with_parts(encoder: CategoryEncoder, scaler: NumericScaler) -> Self {
        Self { encoder, scaler }
    }

    /// Validate a submission and extract its feature vector.
    pub fn extract(&self, submission: &FormSubmission) -> Result<Vec<f32>> {
        let mut features = Vec::with_capacity(self.feature_count());

        // Numeric features (4)
        for field in NumericField::ALL {
            features.push(self.scaled_numeric(submission, field)?);
        }

        // Categorical features, in table order
        for spec in self.encoder.fields() {
            let value = submission
                .category(&spec.name)
                .ok_or_else(|| PredictorError::MissingField(spec.name.clone()))?;
            features.push(self.encoder.encode(&spec.name, value)? as f32);
        }

        let mut extra: Vec<&String> = submission
            .categorical
            .keys()
            .filter(|name| self.encoder.field(name).is_none())
            .collect();
        extra.sort();
        if let Some(name) = extra.first() {
            return Err(PredictorError::UnknownField((*name).clone()));
        }

        Ok(features)
    }

    /// Check a numeric answer against its form bounds and scale it.
    ///
    /// Unbounded fields are capped at `f32::MAX`, and a value whose scaled
    /// feature does not fit in an `f32` is out of range as well.
    fn scaled_numeric(&self, submission: &FormSubmission, field: NumericField) -> Result<f32> {
        let value = submission
            .numeric(field)
            .ok_or_else(|| PredictorError::MissingField(field.label().to_string()))?;

        let max = field.max().unwrap_or(f32::MAX as f64);
        let out_of_range = || PredictorError::OutOfRange {
            field: field.label().to_string(),
            value,
            min: field.min(),
            max,
        };

        if !value.is_finite() || value < field.min() || value > max {
            return Err(out_of_range());
        }

        let scaled = self.scaler.scale(field, value) as f32;
        if !scaled.is_finite() {
            return Err(out_of_range());
        }
        Ok(scaled)
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        NumericField::ALL.len() + self.encoder.len()
    }

    /// Get feature names in vector order.
    pub fn feature_names(&self) -> Vec<&str> {
        NumericField::ALL
            .iter()
            .map(|f| f.label())
            .chain(self.encoder.fields().iter().map(|f| f.name.as_str()))
            .collect()
    }

    pub fn encoder(&self) -> &CategoryEncoder {
        &self.encoder
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A complete, in-range submission used across test modules
    pub(crate) fn sample_submission() -> FormSubmission {
        let encoder = CategoryEncoder::new();
        let mut submission = FormSubmission::new()
            .with_numeric(NumericField::BusinessOwnership, 250.0)
            .with_numeric(NumericField::EmploymentRates, 75.0)
            .with_numeric(NumericField::WomenInLeadership, 30.0)
            .with_numeric(NumericField::TariffRates, 4.0);
        for field in encoder.fields() {
            submission = submission.with_category(&field.name, &field.options[0]);
        }
        submission
    }

    #[test]
    fn test_feature_extraction() {
        let extractor = FeatureExtractor::new();
        let features = extractor.extract(&sample_submission()).unwrap();

        assert_eq!(features.len(), extractor.feature_count());
        assert_eq!(features[0], 0.0); // business ownership at mean
        assert_eq!(features[1], 1.0); // employment (75 - 55) / 20
        assert_eq!(features[2], 0.0); // leadership at mean
        assert_eq!(features[3], -1.0); // tariff (4 - 12) / 8
        assert_eq!(features[4], 1.0); // Trade Flows = Increasing
        assert_eq!(features[5], 0.0); // Access to Finances = High
    }

    #[test]
    fn test_feature_count() {
        let extractor = FeatureExtractor::new();
        assert_eq!(extractor.feature_count(), 20);
        assert_eq!(extractor.feature_names().len(), 20);
        assert_eq!(extractor.feature_names()[0], "Business Ownership");
        assert_eq!(extractor.feature_names()[4], "Trade Flows");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = FeatureExtractor::new();
        let submission = sample_submission();
        assert_eq!(
            extractor.extract(&submission).unwrap(),
            extractor.extract(&submission).unwrap()
        );
    }

    #[test]
    fn test_missing_numeric_rejected() {
        let extractor = FeatureExtractor::new();
        let mut submission = sample_submission();
        submission.tariff_rates = None;

        let err = extractor.extract(&submission).unwrap_err();
        assert!(matches!(err, PredictorError::MissingField(ref f) if f == "Tariff Rates"));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let extractor = FeatureExtractor::new();

        let submission =
            sample_submission().with_numeric(NumericField::EmploymentRates, 100.5);
        assert!(matches!(
            extractor.extract(&submission).unwrap_err(),
            PredictorError::OutOfRange { .. }
        ));

        let submission = sample_submission().with_numeric(NumericField::BusinessOwnership, -1.0);
        assert!(matches!(
            extractor.extract(&submission).unwrap_err(),
            PredictorError::OutOfRange { .. }
        ));

        // No upper bound on business ownership
        let submission =
            sample_submission().with_numeric(NumericField::BusinessOwnership, 1_000_000.0);
        assert!(extractor.extract(&submission).is_ok());
    }

    #[test]
    fn test_extreme_business_ownership_rejected() {
        let extractor = FeatureExtractor::new();

        let submission = sample_submission().with_numeric(NumericField::BusinessOwnership, 1e300);
        let err = extractor.extract(&submission).unwrap_err();
        assert!(matches!(
            err,
            PredictorError::OutOfRange { ref field, .. } if field == "Business Ownership"
        ));
        assert!(err.is_client_error());

        // A tiny spread overflows f32 even below the cap
        let mut scaling = crate::config::ScalingConfig::default();
        scaling.business_ownership = crate::config::ScaleParams::new(0.0, 1e-30);
        let extractor =
            FeatureExtractor::with_parts(CategoryEncoder::new(), NumericScaler::new(scaling));
        let submission = sample_submission().with_numeric(NumericField::BusinessOwnership, 1e10);
        assert!(matches!(
            extractor.extract(&submission).unwrap_err(),
            PredictorError::OutOfRange { .. }
        ));

        let features = extractor.extract(&sample_submission()).unwrap();
        assert!(features.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn test_missing_or_unknown_category_rejected() {
        let extractor = FeatureExtractor::new();

        let mut submission = sample_submission();
        submission
            .categorical
            .insert("Feedback Loops".to_string(), None);
        assert!(matches!(
            extractor.extract(&submission).unwrap_err(),
            PredictorError::MissingField(ref f) if f == "Feedback Loops"
        ));

        let submission = sample_submission().with_category("Weather", "Sunny");
        assert!(matches!(
            extractor.extract(&submission).unwrap_err(),
            PredictorError::UnknownField(ref f) if f == "Weather"
        ));

        let submission = sample_submission().with_category("Legal Frameworks", "Lenient");
        assert!(matches!(
            extractor.extract(&submission).unwrap_err(),
            PredictorError::UnknownCategory { .. }
        ));
    }
}
