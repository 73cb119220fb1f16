//! Model invocation boundary.
//!
//! The detector and classifier are opaque pre-trained models. Everything in
//! the recognition stages talks to them through [`Inference`] and
//! [`RegionDetector`], so any backend able to map a tensor to a tensor can be
//! plugged in. Implementations must be usable from several threads at once
//! without mutating shared state.

pub mod rten_backend;

use image::{GrayImage, RgbImage};

use crate::error::InferenceError;
use crate::models::Rectangle;

pub use rten_backend::RtenModel;

/// Dense row-major f32 tensor exchanged with models
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl ModelTensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self, InferenceError> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: format!("{} values for shape {:?}", expected, shape),
                actual: format!("{} values", data.len()),
            });
        }
        Ok(Self { shape, data })
    }

    /// Build a `[1, H, W, 3]` tensor from an RGB image, keeping raw 0-255 intensities
    pub fn from_rgb_image(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let data = image.as_raw().iter().map(|&v| v as f32).collect();
        Self {
            shape: vec![1, height as usize, width as usize, 3],
            data,
        }
    }

    /// Build a `[1, H, W, 3]` tensor from a grayscale image by repeating its channel
    pub fn from_gray_image(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        let data = image.as_raw().iter().flat_map(|&v| [v as f32; 3]).collect();
        Self {
            shape: vec![1, height as usize, width as usize, 3],
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// A pre-trained model that maps one tensor to another
pub trait Inference: Send + Sync {
    fn predict(&self, input: &ModelTensor) -> Result<ModelTensor, InferenceError>;

    /// Human-readable name used in logs and errors
    fn name(&self) -> &str;
}

impl<T: Inference + ?Sized> Inference for std::sync::Arc<T> {
    fn predict(&self, input: &ModelTensor) -> Result<ModelTensor, InferenceError> {
        (**self).predict(input)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Anything that proposes rectangles likely to contain a plate
pub trait RegionDetector: Send + Sync {
    /// Candidate regions in image coordinates; may be empty
    fn detect_regions(&self, image: &RgbImage) -> Result<Vec<Rectangle>, InferenceError>;
}

/// Region detector backed by a tensor model.
///
/// The image goes in as `[1, H, W, 3]`; the output is read as rows whose
/// first four values are `x, y, w, h`. Extra columns (scores, class ids) are
/// ignored. Rows with non-positive extents, or values that are not finite
/// or do not fit image coordinates, are dropped.
pub struct TensorRegionDetector<M> {
    model: M,
}

impl<M: Inference> TensorRegionDetector<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }
}

impl<M: Inference> RegionDetector for TensorRegionDetector<M> {
    fn detect_regions(&self, image: &RgbImage) -> Result<Vec<Rectangle>, InferenceError> {
        let output = self.model.predict(&ModelTensor::from_rgb_image(image))?;
        decode_rectangles(&output)
    }
}

/// Interpret a detector output tensor as a list of rectangles
pub fn decode_rectangles(output: &ModelTensor) -> Result<Vec<Rectangle>, InferenceError> {
    if output.data().is_empty() {
        return Ok(Vec::new());
    }

    let row_len = output.shape().last().copied().unwrap_or(0);
    if row_len < 4 {
        return Err(InferenceError::ShapeMismatch {
            expected: "rows of at least 4 values (x, y, w, h)".to_string(),
            actual: format!("{:?}", output.shape()),
        });
    }

    let rects = output
        .data()
        .chunks_exact(row_len)
        .filter_map(|row| {
            let (w, h) = (to_coord(row[2])?, to_coord(row[3])?);
            if w < 1 || h < 1 {
                return None;
            }
            Rectangle::new(to_coord(row[0])?, to_coord(row[1])?, w as u32, h as u32)
        })
        .collect();

    Ok(rects)
}

fn to_coord(value: f32) -> Option<i32> {
    let value = value.round();
    if !value.is_finite() || value < i32::MIN as f32 || value >= i32::MAX as f32 {
        return None;
    }
    Some(value as i32)
}

/// Region detector built from a fixed list of rectangles.
/// Useful when regions come from an external service or an annotation file.
#[derive(Debug, Clone, Default)]
pub struct FixedRegions(pub Vec<Rectangle>);

impl RegionDetector for FixedRegions {
    fn detect_regions(&self, _image: &RgbImage) -> Result<Vec<Rectangle>, InferenceError> {
        Ok(self.0.clone())
    }
}
