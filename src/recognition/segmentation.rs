use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma, RgbImage};

use crate::config::RecognitionConfig;
use crate::error::Result;
use crate::models::{GlyphBox, GlyphImage, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::recognition::contours::{ink_mask, outer_contours};
use crate::recognition::preprocessing::{binarize, force_border, to_grayscale, validate_image};

/// Glyph size before it is framed with a 1px border
const INNER_WIDTH: u32 = GLYPH_WIDTH - 2;
const INNER_HEIGHT: u32 = GLYPH_HEIGHT - 2;

/// Plausible character extents, derived from the plate canvas size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBounds {
    pub lower_width: f32,
    pub upper_width: f32,
    pub lower_height: f32,
    pub upper_height: f32,
}

impl SizeBounds {
    pub fn for_canvas(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            lower_width: w / 24.0,
            upper_width: w / 8.0,
            lower_height: h / 3.0,
            upper_height: 2.0 * h / 3.0,
        }
    }

    /// Rejects specks as well as bolts, frames and other oversized blobs
    pub fn accepts(&self, glyph: &GlyphBox, min_width: u32) -> bool {
        let (w, h) = (glyph.width(), glyph.height());
        w >= min_width
            && (w as f32) < self.upper_width
            && (h as f32) > self.lower_height
            && (h as f32) < self.upper_height
    }

    /// Narrow glyphs such as "1" are centered instead of stretched
    pub fn is_narrow(&self, glyph: &GlyphBox) -> bool {
        glyph.width() < INNER_WIDTH && (glyph.width() as f32) < self.lower_width
    }
}

/// Intermediate and final products of segmenting one plate
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Binarized plate canvas with the forced background border
    pub binary: GrayImage,
    /// Extracted glyphs in reading order
    pub glyphs: Vec<GlyphImage>,
}

/// Splits a plate crop into ordered character glyphs
#[derive(Debug, Clone)]
pub struct GlyphSegmenter {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub base_threshold: u8,
    pub border_width: u32,
    pub max_contours: usize,
    pub min_glyph_width: u32,
    pub max_glyphs: usize,
}

impl GlyphSegmenter {
    pub fn new(config: &RecognitionConfig) -> Self {
        Self {
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            base_threshold: config.base_threshold,
            border_width: config.border_width,
            max_contours: config.max_contours,
            min_glyph_width: config.min_glyph_width,
            max_glyphs: config.max_glyphs,
        }
    }

    /// Glyphs of a plate crop, left to right; empty when nothing looks like a character
    pub fn segment(&self, plate: &RgbImage) -> Result<Vec<GlyphImage>> {
        Ok(self.segment_detailed(plate)?.glyphs)
    }

    /// Resize, binarize and frame the plate crop in white
    pub fn binarize_plate(&self, plate: &RgbImage) -> Result<GrayImage> {
        let plate = DynamicImage::ImageRgb8(plate.clone());
        validate_image(&plate)?;

        let canvas =
            plate.resize_exact(self.canvas_width, self.canvas_height, FilterType::Triangle);
        let (mut binary, level) = binarize(&to_grayscale(&canvas), self.base_threshold);
        force_border(&mut binary, self.border_width, 255);

        log::debug!("Binarized plate canvas at level {}", level);
        Ok(binary)
    }

    pub fn segment_detailed(&self, plate: &RgbImage) -> Result<Segmentation> {
        let binary = self.binarize_plate(plate)?;
        let bounds = SizeBounds::for_canvas(binary.width(), binary.height());

        let contours = outer_contours(&ink_mask(&binary));
        let total = contours.len();

        let mut glyphs: Vec<GlyphImage> = contours
            .into_iter()
            .take(self.max_contours)
            .filter(|c| bounds.accepts(c, self.min_glyph_width))
            .take(self.max_glyphs)
            .map(|c| GlyphImage {
                image: extract_glyph(&binary, &c, &bounds),
                x: c.min_x,
            })
            .collect();

        glyphs.sort_by_key(|g| g.x);

        log::debug!("Accepted {} glyphs from {} contours", glyphs.len(), total);
        Ok(Segmentation { binary, glyphs })
    }
}

/// Cut one glyph out of the binarized canvas and frame it for the classifier
pub fn extract_glyph(binary: &GrayImage, glyph: &GlyphBox, bounds: &SizeBounds) -> GrayImage {
    let (w, h) = (glyph.width(), glyph.height());
    let region = image::imageops::crop_imm(binary, glyph.min_x, glyph.min_y, w, h).to_image();

    let mut fitted = if bounds.is_narrow(glyph) {
        let scaled = image::imageops::resize(&region, w, INNER_HEIGHT, FilterType::Triangle);
        let mut centered = GrayImage::from_pixel(INNER_WIDTH, INNER_HEIGHT, Luma([255u8]));
        let begin = (INNER_WIDTH - w) / 2;
        image::imageops::overlay(&mut centered, &scaled, begin.into(), 0);
        centered
    } else {
        image::imageops::resize(&region, INNER_WIDTH, INNER_HEIGHT, FilterType::Triangle)
    };

    // Classifier expects bright ink on a dark field
    image::imageops::invert(&mut fitted);

    let mut framed = GrayImage::new(GLYPH_WIDTH, GLYPH_HEIGHT);
    image::imageops::overlay(&mut framed, &fitted, 1, 1);
    framed
}
