//! Error types for form handling and model inference

use thiserror::Error;

/// Result type alias for predictor operations
pub type Result<T> = std::result::Result<T, PredictorError>;

/// Errors that can occur while turning a form submission into a prediction
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Invalid submission payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Missing value for field '{0}'")]
    MissingField(String),

    #[error("Value {value} for field '{field}' is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Unknown option '{value}' for field '{field}' (expected one of: {})", .options.join(", "))]
    UnknownCategory {
        field: String,
        value: String,
        options: Vec<String>,
    },

    #[error("Feature vector has {actual} values, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl PredictorError {
    /// Short machine-readable error kind, used in replies and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            PredictorError::InvalidPayload(_) => "invalid_payload",
            PredictorError::MissingField(_) => "missing_field",
            PredictorError::OutOfRange { .. } => "out_of_range",
            PredictorError::UnknownField(_) => "unknown_field",
            PredictorError::UnknownCategory { .. } => "unknown_category",
            PredictorError::DimensionMismatch { .. } => "dimension_mismatch",
            PredictorError::Inference(_) => "inference",
        }
    }

    /// Whether the error was caused by the submitted form rather than the service
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            PredictorError::DimensionMismatch { .. } | PredictorError::Inference(_)
        )
    }
}
