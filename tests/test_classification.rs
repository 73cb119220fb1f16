//! Tests for glyph normalization, classification and plate assembly.

mod common;

use image::GrayImage;
use plateread::models::GlyphImage;
use plateread::recognition::classifier::{arg_max, index_to_char};
use plateread::recognition::{assemble, GlyphClassifier, GlyphNormalizer, GlyphSegmenter};

use common::*;

#[test]
fn test_normalizer_builds_three_channel_batch() {
    let glyph = GlyphImage {
        image: GrayImage::from_fn(24, 44, |x, _| image::Luma([if x < 12 { 0 } else { 255 }])),
        x: 0,
    };

    let tensor = GlyphNormalizer::default().to_classifier_input(&glyph);

    assert_eq!(tensor.shape(), &[1, 28, 28, 3]);
    assert_eq!(tensor.data().len(), 28 * 28 * 3);
    for pixel in tensor.data().chunks_exact(3) {
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
    }
    // Raw intensities, no rescaling
    assert_eq!(tensor.data()[0], 0.0);
    assert_eq!(tensor.data()[(28 - 1) * 3], 255.0);
}

#[test]
fn test_alphabet_mapping() {
    assert_eq!(index_to_char(0), '#');
    assert_eq!(index_to_char(1), '0');
    assert_eq!(index_to_char(10), '9');
    assert_eq!(index_to_char(11), 'A');
    assert_eq!(index_to_char(36), 'Z');
    assert_eq!(index_to_char(500), '#');
}

#[test]
fn test_arg_max_prefers_first_maximum() {
    assert_eq!(arg_max(&[0.1, 0.7, 0.2]), Some(1));
    assert_eq!(arg_max(&[0.5, 0.5, 0.1]), Some(0));
    assert_eq!(arg_max(&[f32::NAN, 0.3, 0.2]), Some(1));
    assert_eq!(arg_max(&[]), None);
}

#[test]
fn test_classifier_maps_scores_to_character() -> anyhow::Result<()> {
    let model = ConstantClassifier(12);
    let classifier = GlyphClassifier::new(&model);
    let input = ModelTensor::new(vec![1, 1], vec![0.0])?;

    assert_eq!(classifier.classify(&input)?, 'B');
    Ok(())
}

#[test]
fn test_classifier_rejects_empty_output() -> anyhow::Result<()> {
    struct EmptyModel;
    impl Inference for EmptyModel {
        fn predict(&self, _input: &ModelTensor) -> Result<ModelTensor, InferenceError> {
            ModelTensor::new(vec![1, 0], vec![])
        }
        fn name(&self) -> &str {
            "empty"
        }
    }

    let classifier = GlyphClassifier::new(&EmptyModel);
    let input = ModelTensor::new(vec![1, 1], vec![0.0])?;

    assert!(matches!(classifier.classify(&input), Err(InferenceError::EmptyOutput(_))));
    Ok(())
}

#[test]
fn test_assemble_strips_every_sentinel() {
    assert_eq!(assemble("#A#1##B".chars()), "A1B");
    assert_eq!(assemble("####".chars()), "");
    assert_eq!(assemble("".chars()), "");
    assert_eq!(assemble("AA1234BC".chars()), "AA1234BC");
}

fn read_plate(classifier: &dyn Inference) -> anyhow::Result<String> {
    let glyphs = GlyphSegmenter::new(&RecognitionConfig::default()).segment(&synthetic_plate())?;
    let normalizer = GlyphNormalizer::default();
    let classifier = GlyphClassifier::new(classifier);

    let mut characters = Vec::new();
    for glyph in &glyphs {
        characters.push(classifier.classify(&normalizer.to_classifier_input(glyph))?);
    }
    Ok(assemble(characters))
}

#[test]
fn test_segment_classify_assemble_reads_plate() -> anyhow::Result<()> {
    assert_eq!(read_plate(&ShapeClassifier)?, "AB1");
    Ok(())
}

#[test]
fn test_sentinel_only_classifier_reads_nothing() -> anyhow::Result<()> {
    assert_eq!(read_plate(&ConstantClassifier(0))?, "");
    Ok(())
}
