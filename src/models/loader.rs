//! Model artifact loader

use super::{Classifier, LogisticModel, OnnxModel};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Supported artifact formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Onnx,
    CoefficientJson,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("onnx") => Some(ModelFormat::Onnx),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(ModelFormat::CoefficientJson),
            _ => None,
        }
    }
}

/// Loader for the classifier artifact
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of ONNX threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier stored at `path`
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Arc<dyn Classifier>> {
        let path = path.as_ref();

        info!(path = %path.display(), "Attempting to load the model");

        if !path.exists() {
            anyhow::bail!("Model file not found: {}", path.display());
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        let model: Arc<dyn Classifier> = match ModelFormat::from_path(path) {
            Some(ModelFormat::Onnx) => {
                ort::init().commit()?;
                info!(onnx_threads = self.onnx_threads, "ONNX Runtime initialized");
                Arc::new(OnnxModel::load(path, &name, self.onnx_threads)?)
            }
            Some(ModelFormat::CoefficientJson) => Arc::new(LogisticModel::from_json_file(path)?),
            None => anyhow::bail!(
                "Unsupported model format for {} (expected .onnx or .json)",
                path.display()
            ),
        };

        info!(
            model = %model.name(),
            input_dim = ?model.input_dim(),
            "Model loaded successfully"
        );

        Ok(model)
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ModelFormat::from_path(Path::new("models/model.onnx")),
            Some(ModelFormat::Onnx)
        );
        assert_eq!(
            ModelFormat::from_path(Path::new("model.JSON")),
            Some(ModelFormat::CoefficientJson)
        );
        assert_eq!(ModelFormat::from_path(Path::new("model.pkl")), None);
    }

    #[test]
    fn test_load_json_model() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"name": "tiny", "coefficients": [1.0, 2.0], "intercept": 0.0}}"#)
            .unwrap();

        let model = ModelLoader::new().load(file.path()).unwrap();
        assert_eq!(model.name(), "tiny");
        assert_eq!(model.input_dim(), Some(2));
        assert_eq!(model.predict_proba(&[0.0, 0.0]).unwrap(), 0.5);
    }

    #[test]
    fn test_missing_or_unsupported_artifact() {
        let err = ModelLoader::new().load("/nonexistent/model.json").err().unwrap();
        assert!(err.to_string().contains("Model file not found"));

        let file = tempfile::Builder::new().suffix(".pkl").tempfile().unwrap();
        let err = ModelLoader::new().load(file.path()).err().unwrap();
        assert!(err.to_string().contains("Unsupported model format"));
    }
}
