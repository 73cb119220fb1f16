pub mod assemble;
pub mod classifier;
pub mod contours;
pub mod glyph;
pub mod preprocessing;
pub mod region;
pub mod segmentation;

pub use assemble::assemble;
pub use classifier::GlyphClassifier;
pub use glyph::GlyphNormalizer;
pub use preprocessing::{decode_image, normalize, open_image, validate_image};
pub use region::PlateRegionDetector;
pub use segmentation::{GlyphSegmenter, Segmentation};
