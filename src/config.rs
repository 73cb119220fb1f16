use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RecognitionError, Result};

/// Tunable parameters of the recognition stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Images taller than this are scaled down before recognition
    pub target_height: u32,

    /// Fraction of a detected region trimmed from each side
    pub trim_ratio: f32,

    /// Regions taller than this keep their full width
    pub trim_height_cutoff: u32,

    /// Fixed canvas the plate crop is resized to before segmentation
    pub canvas_width: u32,
    pub canvas_height: u32,

    /// Threshold used when the canvas histogram cannot be split
    pub base_threshold: u8,

    /// Pixels forced to background on every canvas edge
    pub border_width: u32,

    /// Largest contours considered as glyph candidates
    pub max_contours: usize,

    /// Narrowest accepted glyph, in canvas pixels
    pub min_glyph_width: u32,

    /// Glyphs collected per plate
    pub max_glyphs: usize,

    /// Square spatial size of the classifier input
    pub classifier_input_size: u32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            target_height: 720,
            trim_ratio: 0.1,
            trim_height_cutoff: 75,
            canvas_width: 333,
            canvas_height: 75,
            base_threshold: 112,
            border_width: 3,
            max_contours: 16,
            min_glyph_width: 6,
            max_glyphs: 10,
            classifier_input_size: 28,
        }
    }
}

impl RecognitionConfig {
    /// Load a JSON configuration file, falling back to defaults for missing fields
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| RecognitionError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the stages cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.target_height == 0 {
            return Err(RecognitionError::Config("target_height must be positive".into()));
        }
        if !(0.0..0.5).contains(&self.trim_ratio) {
            return Err(RecognitionError::Config(format!(
                "trim_ratio must be in [0, 0.5), got {}",
                self.trim_ratio
            )));
        }
        let min_side = 2 * self.border_width;
        if self.canvas_width <= min_side || self.canvas_height <= min_side {
            return Err(RecognitionError::Config(format!(
                "canvas {}x{} is too small for a {}px border",
                self.canvas_width, self.canvas_height, self.border_width
            )));
        }
        if self.classifier_input_size == 0 {
            return Err(RecognitionError::Config("classifier_input_size must be positive".into()));
        }
        Ok(())
    }
}
