//! Categorical feature encoding.
//!
//! Each categorical survey answer is mapped to a fixed integer code. Codes
//! follow label-encoder semantics: an option's code is its position in the
//! lexicographically sorted option list, so the code of an option never
//! depends on the order the form displays them in.

use crate::error::{PredictorError, Result};
use anyhow::Context;
use std::path::Path;
use tracing::info;

/// Built-in category table, in form order.
const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Trade Flows", &["Increasing", "Stable", "Decreasing"]),
    ("Access to Finances", &["High", "Moderate", "Low"]),
    ("Farming Type", &["Communal", "Single-household", "Mixed"]),
    ("Education and Skills", &["Advanced", "Basic", "Intermediate"]),
    ("Changes in Women's Income", &["Rising", "Falling", "Stable"]),
    ("Clear Decision Points", &["Yes", "No", "Partial"]),
    ("Policy Changes", &["Significant", "Minor", "None"]),
    ("Complex Interactions", &["High", "Medium", "Low"]),
    ("Feedback Loops", &["Present", "Absent", "Weak"]),
    ("Intra-African Mobility", &["Increasing", "Decreasing", "Stable"]),
    ("Legal Frameworks", &["Supportive", "Neutral", "Restrictive"]),
    ("Social Norms and Gender Roles", &["Progressive", "Traditional", "Mixed"]),
    ("Access to Childcare", &["Good", "Limited", "None"]),
    ("Impact on Women", &["Positive", "Negative", "Neutral"]),
    ("Value Chain Participation", &["High", "Moderate", "Low"]),
    ("Health and Well-being", &["Improved", "Declining", "Stable"]),
];

/// A single categorical form field and its allowed options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalField {
    /// Field label as shown on the form
    pub name: String,
    /// Options in display order
    pub options: Vec<String>,
    /// Options in code order
    sorted: Vec<String>,
}

impl CategoricalField {
    pub fn new(name: impl Into<String>, options: Vec<String>) -> Self {
        let mut sorted = options.clone();
        sorted.sort();
        sorted.dedup();
        Self {
            name: name.into(),
            options,
            sorted,
        }
    }

    /// Code for an option, or `None` if the option is not allowed
    pub fn code_of(&self, value: &str) -> Option<u32> {
        self.sorted
            .binary_search_by(|opt| opt.as_str().cmp(value))
            .ok()
            .map(|idx| idx as u32)
    }
}

/// Fixed lookup table from categorical answers to numeric codes.
#[derive(Debug, Clone)]
pub struct CategoryEncoder {
    fields: Vec<CategoricalField>,
}

impl CategoryEncoder {
    /// Create an encoder over the built-in category table.
    pub fn new() -> Self {
        let fields = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, options)| {
                CategoricalField::new(*name, options.iter().map(|o| o.to_string()).collect())
            })
            .collect();
        Self { fields }
    }

    /// Create an encoder from an explicit list of fields.
    pub fn from_fields(fields: Vec<CategoricalField>) -> Self {
        Self { fields }
    }

    /// Load a category table from a JSON file of the form
    /// `{ "Field": ["Option", ...], ... }`. Key order is preserved and
    /// becomes the feature order.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Category file '{}' not found", path.display()))?;
        let encoder = Self::from_json_str(&content)
            .with_context(|| format!("Category file '{}' is not formatted correctly", path.display()))?;

        info!(
            path = %path.display(),
            fields = encoder.len(),
            "Loaded category table"
        );
        Ok(encoder)
    }

    /// Parse a category table from JSON text.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let table: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut fields = Vec::with_capacity(table.len());

        for (name, value) in table {
            let options: Vec<String> = serde_json::from_value(value)
                .with_context(|| format!("options for '{}' must be a list of strings", name))?;
            if options.is_empty() {
                anyhow::bail!("field '{}' has no options", name);
            }
            fields.push(CategoricalField::new(name, options));
        }

        if fields.is_empty() {
            anyhow::bail!("category table is empty");
        }

        Ok(Self { fields })
    }

    /// Encode a single answer.
    pub fn encode(&self, field: &str, value: &str) -> Result<u32> {
        let spec = self
            .field(field)
            .ok_or_else(|| PredictorError::UnknownField(field.to_string()))?;

        spec.code_of(value)
            .ok_or_else(|| PredictorError::UnknownCategory {
                field: field.to_string(),
                value: value.to_string(),
                options: spec.options.clone(),
            })
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&CategoricalField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields in feature order.
    pub fn fields(&self) -> &[CategoricalField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for CategoryEncoder {
    fn default() -> Self {
        Self::new()
    }
}
