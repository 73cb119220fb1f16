use rten::Model;
use rten_tensor::Tensor;
use rten_tensor::prelude::*;
use std::path::Path;

use super::{Inference, ModelTensor};
use crate::error::InferenceError;

/// `.rten` model loaded once and run read-only
pub struct RtenModel {
    name: String,
    model: Model,
}

impl RtenModel {
    /// Load a model file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if !path.exists() {
            return Err(InferenceError::Backend {
                model: name,
                message: format!("model file not found: {}", path.display()),
            });
        }

        let model = Model::load_file(path).map_err(|e| InferenceError::Backend {
            model: name.clone(),
            message: format!("failed to load: {}", e),
        })?;

        log::info!(
            "Loaded model {} ({} inputs, {} outputs)",
            name,
            model.input_ids().len(),
            model.output_ids().len()
        );

        Ok(Self { name, model })
    }
}

impl Inference for RtenModel {
    fn predict(&self, input: &ModelTensor) -> Result<ModelTensor, InferenceError> {
        let tensor = Tensor::from_data(input.shape(), input.data().to_vec());

        let output = self
            .model
            .run_one(tensor.view().into(), None)
            .map_err(|e| InferenceError::Backend {
                model: self.name.clone(),
                message: format!("run failed: {}", e),
            })?;

        let output: Tensor<f32> = output.try_into().map_err(|_| InferenceError::Backend {
            model: self.name.clone(),
            message: "expected a float32 output".to_string(),
        })?;

        ModelTensor::new(output.shape().to_vec(), output.to_vec())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
