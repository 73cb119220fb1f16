use image::imageops::FilterType;

use crate::inference::ModelTensor;
use crate::models::GlyphImage;

/// Turns framed glyphs into classifier input tensors
#[derive(Debug, Clone)]
pub struct GlyphNormalizer {
    /// Square spatial size the classifier was trained on
    pub input_size: u32,
}

impl GlyphNormalizer {
    pub fn new(input_size: u32) -> Self {
        Self { input_size }
    }

    /// Resize to `input_size` squared and replicate the single channel three
    /// times, producing a `[1, size, size, 3]` tensor of raw intensities.
    pub fn to_classifier_input(&self, glyph: &GlyphImage) -> ModelTensor {
        let resized = image::imageops::resize(
            &glyph.image,
            self.input_size,
            self.input_size,
            FilterType::Triangle,
        );
        ModelTensor::from_gray_image(&resized)
    }
}

impl Default for GlyphNormalizer {
    fn default() -> Self {
        Self::new(28)
    }
}
