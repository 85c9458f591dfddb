//! Numeric feature scaling.

use crate::config::{ScaleParams, ScalingConfig};
use crate::types::NumericField;

/// Standardizes numeric survey inputs with fixed per-field parameters.
///
/// `scaled = (raw - mean) / std`. A zero standard deviation scales by 1,
/// which leaves the centred value unchanged.
#[derive(Debug, Clone)]
pub struct NumericScaler {
    params: ScalingConfig,
}

impl NumericScaler {
    pub fn new(params: ScalingConfig) -> Self {
        Self { params }
    }

    /// Scale a raw value for the given field
    pub fn scale(&self, field: NumericField, raw: f64) -> f64 {
        Self::standardize(raw, self.params.params(field))
    }

    /// Standardize a raw value
    pub fn standardize(raw: f64, params: ScaleParams) -> f64 {
        let std = if params.std == 0.0 { 1.0 } else { params.std };
        (raw - params.mean) / std
    }

    pub fn params(&self, field: NumericField) -> ScaleParams {
        self.params.params(field)
    }
}

impl Default for NumericScaler {
    fn default() -> Self {
        Self::new(ScalingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardize() {
        let params = ScaleParams::new(50.0, 25.0);
        assert_eq!(NumericScaler::standardize(50.0, params), 0.0);
        assert_eq!(NumericScaler::standardize(100.0, params), 2.0);
        assert_eq!(NumericScaler::standardize(0.0, params), -2.0);
    }

    #[test]
    fn test_zero_std_only_centres() {
        let params = ScaleParams::new(10.0, 0.0);
        assert_eq!(NumericScaler::standardize(13.0, params), 3.0);
    }

    #[test]
    fn test_scaling_is_pure() {
        let scaler = NumericScaler::default();
        for field in NumericField::ALL {
            let a = scaler.scale(field, 42.0);
            let _ = scaler.scale(field, 7.0);
            let b = scaler.scale(field, 42.0);
            assert_eq!(a, b);
        }
        // employment defaults: mean 55, std 20
        assert_eq!(scaler.scale(NumericField::EmploymentRates, 75.0), 1.0);
    }
}
