//! Error types for plate recognition.
//!
//! Only conditions that make a call meaningless are errors. A missing plate,
//! a plate without readable glyphs, or glyphs the classifier rejects are
//! ordinary outcomes and are reported through empty results instead.

use thiserror::Error;

/// Errors raised while running a model
#[derive(Error, Debug)]
pub enum InferenceError {
    /// The backend failed to load or run the model
    #[error("{model}: {message}")]
    Backend { model: String, message: String },

    /// Tensor shape does not fit the data or the model's expectation
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Model produced an output without any values
    #[error("{0} produced an empty output")]
    EmptyOutput(String),
}

/// Errors that abort a recognition call
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// Image is empty, zero-sized or could not be decoded
    #[error("malformed input image: {0}")]
    MalformedInput(String),

    #[error("model inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RecognitionError>;
