//! Form schema served to the UI that renders the survey.

use crate::encoding::CategoryEncoder;
use crate::types::NumericField;
use serde::{Deserialize, Serialize};

pub const FORM_TITLE: &str = "Women Empowerment Predictor";
pub const FORM_DESCRIPTION: &str = "Enter the details to predict women empowerment status.";
pub const SUBMIT_LABEL: &str = "Run Prediction";

/// A numeric input widget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericInput {
    /// Key to submit the value under
    pub key: String,
    pub label: String,
    pub placeholder: String,
    pub min: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// A single-choice select widget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectInput {
    pub key: String,
    pub label: String,
    pub placeholder: String,
    pub options: Vec<String>,
}

/// Description of the whole form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSchema {
    pub title: String,
    pub description: String,
    pub submit_label: String,
    pub numeric: Vec<NumericInput>,
    pub categorical: Vec<SelectInput>,
}

impl FormSchema {
    pub fn build(encoder: &CategoryEncoder) -> Self {
        let numeric = NumericField::ALL
            .iter()
            .map(|field| NumericInput {
                key: field.label().to_string(),
                label: field.display_label().to_string(),
                placeholder: field.placeholder().to_string(),
                min: field.min(),
                max: field.max(),
            })
            .collect();

        let categorical = encoder
            .fields()
            .iter()
            .map(|field| SelectInput {
                key: field.name.clone(),
                label: field.name.clone(),
                placeholder: format!("Select {}", field.name),
                options: field.options.clone(),
            })
            .collect();

        Self {
            title: FORM_TITLE.to_string(),
            description: FORM_DESCRIPTION.to_string(),
            submit_label: SUBMIT_LABEL.to_string(),
            numeric,
            categorical,
        }
    }
}
