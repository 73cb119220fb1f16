use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::RecognitionConfig;
use crate::error::{RecognitionError, Result};
use crate::inference::{Inference, RegionDetector, RtenModel, TensorRegionDetector};
use crate::models::RecognizedPlate;
use crate::recognition::{
    assemble, validate_image, GlyphClassifier, GlyphNormalizer, GlyphSegmenter,
    PlateRegionDetector,
};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Models and settings shared by every recognition call.
///
/// Built once at startup and handed around behind an `Arc`; nothing in it is
/// mutated after construction, so concurrent calls need no locking.
pub struct PipelineContext {
    detector: Arc<dyn RegionDetector>,
    classifier: Arc<dyn Inference>,
    config: RecognitionConfig,
}

impl PipelineContext {
    /// Bundle the models with a configuration, rejecting invalid settings
    pub fn new(
        detector: impl RegionDetector + 'static,
        classifier: impl Inference + 'static,
        config: RecognitionConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            detector: Arc::new(detector),
            classifier: Arc::new(classifier),
            config,
        })
    }

    /// Load both models from `.rten` files
    pub fn from_model_files(
        detector_path: impl AsRef<Path>,
        classifier_path: impl AsRef<Path>,
        config: RecognitionConfig,
    ) -> Result<Self> {
        config.validate()?;
        let detector = TensorRegionDetector::new(RtenModel::load(detector_path)?);
        let classifier = RtenModel::load(classifier_path)?;
        Self::new(detector, classifier, config)
    }

    pub fn detector(&self) -> &dyn RegionDetector {
        self.detector.as_ref()
    }

    pub fn classifier(&self) -> &dyn Inference {
        self.classifier.as_ref()
    }

    pub fn config(&self) -> &RecognitionConfig {
        &self.config
    }
}

/// Runs the recognition stages in order on one image at a time
pub struct Pipeline {
    context: Arc<PipelineContext>,
    debug: Option<DebugConfig>,
}

impl Pipeline {
    pub fn new(context: Arc<PipelineContext>) -> Self {
        Self {
            context,
            debug: None,
        }
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(RecognitionError::Config(format!(
                    "debug directory is not empty: {}",
                    output_dir.display()
                )));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug = Some(DebugConfig { output_dir });

        Ok(self)
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Read the plate in an already normalized image.
    ///
    /// An empty `text` is a normal outcome meaning nothing was recognized;
    /// only malformed images and model failures are errors.
    pub fn recognize(&self, image: &DynamicImage) -> Result<RecognizedPlate> {
        validate_image(image)?;
        let ctx = &self.context;
        let config = ctx.config();

        self.save_debug_image("00_input", "01.png", image)?;

        let (annotated, candidate) =
            PlateRegionDetector::new(config).detect(image, ctx.detector())?;
        self.save_debug_image(
            "01_plate_region",
            "annotated.png",
            &DynamicImage::ImageRgb8(annotated),
        )?;

        let Some(plate) = candidate else {
            log::info!("No plate region found");
            return Ok(RecognizedPlate::default());
        };
        self.save_debug_image(
            "01_plate_region",
            "crop.png",
            &DynamicImage::ImageRgb8(plate.crop.clone()),
        )?;

        let segmentation = GlyphSegmenter::new(config).segment_detailed(&plate.crop)?;
        self.save_debug_image(
            "02_binarized",
            "01.png",
            &DynamicImage::ImageLuma8(segmentation.binary.clone()),
        )?;
        for (idx, glyph) in segmentation.glyphs.iter().enumerate() {
            self.save_debug_image(
                "03_glyphs",
                &format!("{:02}.png", idx + 1),
                &DynamicImage::ImageLuma8(glyph.image.clone()),
            )?;
        }

        let normalizer = GlyphNormalizer::new(config.classifier_input_size);
        let classifier = GlyphClassifier::new(ctx.classifier());
        let characters = segmentation
            .glyphs
            .iter()
            .map(|glyph| classifier.classify(&normalizer.to_classifier_input(glyph)))
            .collect::<std::result::Result<Vec<char>, _>>()?;

        let text = assemble(characters.iter().copied());
        log::info!(
            "Recognized plate '{}' from {} glyphs ({})",
            text,
            characters.len(),
            characters.iter().collect::<String>()
        );

        Ok(RecognizedPlate {
            text,
            glyph_count: characters.len(),
            plate: Some(plate),
        })
    }

    fn save_debug_image(
        &self,
        step_dir_name: &str,
        filename: &str,
        image: &DynamicImage,
    ) -> Result<()> {
        let Some(debug_config) = &self.debug else {
            return Ok(());
        };

        let step_dir = debug_config.output_dir.join(step_dir_name);
        std::fs::create_dir_all(&step_dir)?;

        let output_path = step_dir.join(filename);
        image
            .save(&output_path)
            .map_err(|e| RecognitionError::Io(std::io::Error::other(e)))?;

        log::debug!("Debug: saved {}/{}", step_dir_name, filename);
        Ok(())
    }
}

/// Recognize the plate in `image` using the shared models in `context`
pub fn recognize_plate(
    image: &DynamicImage,
    context: Arc<PipelineContext>,
) -> Result<RecognizedPlate> {
    Pipeline::new(context).recognize(image)
}
