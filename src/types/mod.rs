//! Type definitions for the empowerment predictor

pub mod prediction;
pub mod submission;

pub use prediction::{EmpowermentLabel, PredictionResponse, PredictionResult};
pub use submission::{FormSubmission, NumericField};
