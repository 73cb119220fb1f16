pub mod config;
pub mod error;
pub mod inference;
pub mod models;
pub mod pipeline;
pub mod recognition;

pub use config::RecognitionConfig;
pub use error::{InferenceError, RecognitionError};
pub use inference::{Inference, ModelTensor, RegionDetector, RtenModel, TensorRegionDetector};
pub use models::{GlyphImage, PlateCandidate, RecognizedPlate, Rectangle, ALPHABET, SENTINEL};
pub use pipeline::{recognize_plate, DebugConfig, Pipeline, PipelineContext};
