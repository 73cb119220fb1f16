use crate::error::InferenceError;
use crate::inference::{Inference, ModelTensor};
use crate::models::{ALPHABET, SENTINEL};

/// Map a classifier output position to its character.
/// Positions outside the alphabet count as "no match".
pub fn index_to_char(index: usize) -> char {
    ALPHABET.chars().nth(index).unwrap_or(SENTINEL)
}

/// Position of the highest score; ties go to the lowest index
pub fn arg_max(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top || score.is_nan() => {}
            None if score.is_nan() => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Runs the character model on one glyph tensor at a time
pub struct GlyphClassifier<'a> {
    model: &'a dyn Inference,
}

impl<'a> GlyphClassifier<'a> {
    pub fn new(model: &'a dyn Inference) -> Self {
        Self { model }
    }

    /// Classify one glyph. Every glyph yields exactly one character,
    /// possibly the sentinel.
    pub fn classify(&self, input: &ModelTensor) -> Result<char, InferenceError> {
        let output = self.model.predict(input)?;
        let index = arg_max(output.data())
            .ok_or_else(|| InferenceError::EmptyOutput(self.model.name().to_string()))?;
        Ok(index_to_char(index))
    }
}
