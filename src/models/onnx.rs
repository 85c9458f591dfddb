//! ONNX classifier backed by ONNX Runtime

use super::Classifier;
use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::session::{builder::GraphOptimizationLevel, Session, SessionOutputs};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Loaded ONNX classifier with metadata
pub struct OnnxModel {
    /// Model name
    name: String,
    /// ONNX Runtime session; running it needs exclusive access
    session: Mutex<Session>,
    /// Input name for the model
    input_name: String,
    /// Output name for probabilities
    output_name: String,
}

impl OnnxModel {
    /// Load an ONNX model from file
    pub fn load<P: AsRef<Path>>(path: P, name: &str, onnx_threads: usize) -> Result<Self> {
        let path = path.as_ref();

        info!(model = %name, path = %path.display(), threads = onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        // skl2onnx names it "output_probability"
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "output_probability".to_string())
            });

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(Self {
            name: name.to_string(),
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    /// Extract the class-1 probability from model output.
    /// Handles both tensor outputs (`zipmap=False`) and seq(map) outputs.
    fn extract_probability(&self, outputs: &SessionOutputs) -> Result<f64> {
        if let Some(output) = outputs.get(self.output_name.as_str()) {
            if let Some(prob) = self.extract_from_value(&output) {
                return Ok(prob);
            }
        }

        // Fallback: any non-label output that yields a probability
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Some(prob) = self.extract_from_value(&output) {
                debug!(model = %self.name, output = %name, prob = prob, "Extracted probability (fallback)");
                return Ok(prob);
            }
        }

        anyhow::bail!("model '{}' produced no probability output", self.name)
    }

    fn extract_from_value(&self, output: &DynValue) -> Option<f64> {
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let dims: Vec<i64> = shape.iter().copied().collect();
            return Self::class_one_from_tensor(&dims, data);
        }

        if DynSequenceValueType::can_downcast(&output.dtype()) {
            match self.extract_from_sequence_map(output) {
                Ok(prob) => return Some(prob),
                Err(e) => warn!(model = %self.name, error = %e, "Unreadable seq(map) output"),
            }
        }

        None
    }

    /// Extract probability from seq(map(int64, float)) format
    fn extract_from_sequence_map(&self, output: &DynValue) -> Result<f64> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
        let map_value = maps
            .first()
            .ok_or_else(|| anyhow::anyhow!("Empty sequence"))?;

        let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 1) {
            return Ok(*prob as f64);
        }
        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 0) {
            return Ok(1.0 - *prob as f64);
        }

        Err(anyhow::anyhow!("No probability found in map"))
    }

    /// Class-1 probability from a `[batch, classes]`, `[classes]` or
    /// single-probability tensor
    fn class_one_from_tensor(dims: &[i64], data: &[f32]) -> Option<f64> {
        let classes = match dims {
            [_, classes] | [classes] => *classes,
            _ => return data.last().map(|&v| v as f64),
        };

        match classes {
            c if c >= 2 => data.get(1).map(|&v| v as f64),
            1 => data.first().map(|&v| v as f64),
            _ => None,
        }
    }
}

impl Classifier for OnnxModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_dim(&self) -> Option<usize> {
        // Shape mismatches surface from the runtime on the first call
        None
    }

    fn predict_proba(&self, features: &[f32]) -> Result<f64> {
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_tensor])?;
        let prob = self.extract_probability(&outputs)?;

        debug!(model = %self.name, prob = prob, "ONNX inference complete");
        Ok(prob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_one_from_tensor() {
        assert_eq!(
            OnnxModel::class_one_from_tensor(&[1, 2], &[0.25, 0.75]),
            Some(0.75)
        );
        assert_eq!(OnnxModel::class_one_from_tensor(&[2], &[0.6, 0.4]), Some(0.4f32 as f64));
        assert_eq!(OnnxModel::class_one_from_tensor(&[1, 1], &[0.3]), Some(0.3f32 as f64));
        assert_eq!(OnnxModel::class_one_from_tensor(&[1, 0], &[]), None);
    }
}
