mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from plateread for tests
pub use plateread::inference::FixedRegions;
pub use plateread::{
    Inference, InferenceError, ModelTensor, Pipeline, PipelineContext, RecognitionConfig,
    RecognitionError, RecognizedPlate, Rectangle,
};
