//! Women Empowerment Predictor Library
//!
//! Turns socio-economic survey answers into a feature vector, runs a
//! pre-trained logistic regression classifier over it and renders the
//! resulting label for the submitting form.

pub mod config;
pub mod consumer;
pub mod encoding;
pub mod error;
pub mod feature_extractor;
pub mod form;
pub mod handler;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod responder;
pub mod scaling;
pub mod types;
pub mod workers;

pub use config::AppConfig;
pub use consumer::SubmissionConsumer;
pub use encoding::CategoryEncoder;
pub use error::PredictorError;
pub use feature_extractor::FeatureExtractor;
pub use form::FormSchema;
pub use handler::PredictorFormHandler;
pub use models::inference::InferenceEngine;
pub use responder::PredictionResponder;
pub use scaling::NumericScaler;
pub use types::{EmpowermentLabel, FormSubmission, PredictionResponse, PredictionResult};
pub use workers::WorkerPool;
