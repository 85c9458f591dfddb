//! Form submission data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Numeric survey inputs, in the order they enter the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    BusinessOwnership,
    EmploymentRates,
    WomenInLeadership,
    TariffRates,
}

impl NumericField {
    /// All numeric fields in feature order
    pub const ALL: [NumericField; 4] = [
        NumericField::BusinessOwnership,
        NumericField::EmploymentRates,
        NumericField::WomenInLeadership,
        NumericField::TariffRates,
    ];

    /// Field name as submitted by the form
    pub fn label(&self) -> &'static str {
        match self {
            NumericField::BusinessOwnership => "Business Ownership",
            NumericField::EmploymentRates => "Employment Rates",
            NumericField::WomenInLeadership => "Women in Leadership",
            NumericField::TariffRates => "Tariff Rates",
        }
    }

    /// Label shown next to the input widget
    pub fn display_label(&self) -> &'static str {
        match self {
            NumericField::EmploymentRates => "Employment Rates (%)",
            other => other.label(),
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            NumericField::BusinessOwnership => {
                "Enter the total number of businesses owned in the target group."
            }
            NumericField::EmploymentRates => {
                "Specify the employment rate as a percentage (0-100%)."
            }
            NumericField::WomenInLeadership => {
                "Provide the count of women in leadership positions."
            }
            NumericField::TariffRates => "Input the tariff rates as a percentage (0-100%).",
        }
    }

    /// Inclusive lower bound
    pub fn min(&self) -> f64 {
        0.0
    }

    /// Inclusive upper bound, if any
    pub fn max(&self) -> Option<f64> {
        match self {
            NumericField::BusinessOwnership => None,
            _ => Some(100.0),
        }
    }
}

/// A raw form submission.
///
/// Numeric answers are keyed by their form label (snake_case aliases are
/// accepted); every other key is treated as a categorical answer. Unanswered
/// fields may be omitted or sent as `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormSubmission {
    /// Caller-supplied identifier, echoed in the reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,

    #[serde(rename = "Business Ownership", alias = "business_ownership", default)]
    pub business_ownership: Option<f64>,

    #[serde(rename = "Employment Rates", alias = "employment_rates", default)]
    pub employment_rates: Option<f64>,

    #[serde(rename = "Women in Leadership", alias = "women_in_leadership", default)]
    pub women_in_leadership: Option<f64>,

    #[serde(rename = "Tariff Rates", alias = "tariff_rates", default)]
    pub tariff_rates: Option<f64>,

    /// Categorical selections keyed by field label
    #[serde(flatten)]
    pub categorical: HashMap<String, Option<String>>,
}

impl FormSubmission {
    /// Create an empty submission
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of a numeric field
    pub fn numeric(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::BusinessOwnership => self.business_ownership,
            NumericField::EmploymentRates => self.employment_rates,
            NumericField::WomenInLeadership => self.women_in_leadership,
            NumericField::TariffRates => self.tariff_rates,
        }
    }

    /// Set a numeric field
    pub fn with_numeric(mut self, field: NumericField, value: f64) -> Self {
        let slot = match field {
            NumericField::BusinessOwnership => &mut self.business_ownership,
            NumericField::EmploymentRates => &mut self.employment_rates,
            NumericField::WomenInLeadership => &mut self.women_in_leadership,
            NumericField::TariffRates => &mut self.tariff_rates,
        };
        *slot = Some(value);
        self
    }

    /// Set a categorical selection
    pub fn with_category(mut self, field: &str, value: &str) -> Self {
        self.categorical
            .insert(field.to_string(), Some(value.to_string()));
        self
    }

    /// Selected option for a categorical field
    pub fn category(&self, field: &str) -> Option<&str> {
        self.categorical.get(field).and_then(|v| v.as_deref())
    }
}
