//! ML model inference components

pub mod inference;
pub mod loader;
pub mod logistic;
pub mod onnx;

pub use inference::InferenceEngine;
pub use loader::ModelLoader;
pub use logistic::LogisticModel;
pub use onnx::OnnxModel;

/// A loaded binary classifier.
///
/// Implementations are immutable after loading and shared across workers.
pub trait Classifier: Send + Sync {
    /// Model name for logs and replies
    fn name(&self) -> &str;

    /// Number of input features the model was trained on, when the artifact
    /// declares it
    fn input_dim(&self) -> Option<usize>;

    /// Feature names in training order, when the artifact records them
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Probability of class 1 for a single feature vector
    fn predict_proba(&self, features: &[f32]) -> anyhow::Result<f64>;
}
