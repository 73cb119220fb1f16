use image::{GrayImage, RgbImage};
use serde::Serialize;

/// Characters the classifier can emit, indexed by its output position.
pub const ALPHABET: &str = "#0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Placeholder emitted for glyphs the classifier could not match
pub const SENTINEL: char = '#';

/// Width of the framed glyph canvas handed to the classifier
pub const GLYPH_WIDTH: u32 = 24;

/// Height of the framed glyph canvas handed to the classifier
pub const GLYPH_HEIGHT: u32 = 44;

/// Axis-aligned rectangle in source image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    /// Create a rectangle, rejecting zero-sized ones and extents that do not
    /// fit the signed coordinate space
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return None;
        }
        Some(Self { x, y, width, height })
    }

    /// Exclusive right edge; may lie beyond `i32::MAX`
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge; may lie beyond `i32::MAX`
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Clip against an image of the given size.
    /// Returns None when nothing of the rectangle lies inside the image.
    pub fn clip_to(&self, image_width: u32, image_height: u32) -> Option<Self> {
        let x0 = self.x.max(0) as i64;
        let y0 = self.y.max(0) as i64;
        let x1 = self.right().min(image_width as i64);
        let y1 = self.bottom().min(image_height as i64);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Self::new(
            i32::try_from(x0).ok()?,
            i32::try_from(y0).ok()?,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        )
    }
}

/// Detected plate region together with the crop taken from it
#[derive(Debug, Clone)]
pub struct PlateCandidate {
    /// Rectangle reported by the region detector
    pub region: Rectangle,
    /// Rectangle actually cropped, after proportional trimming and clipping
    pub crop_rect: Rectangle,
    /// Pixels bounded by `crop_rect`
    pub crop: RgbImage,
}

/// Bounding box of one traced ink region on the binarized plate canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    /// Polygon area enclosed by the traced border
    pub area: f64,
}

impl GlyphBox {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

/// One extracted character position, framed for classification
#[derive(Debug, Clone)]
pub struct GlyphImage {
    /// 24x44 raster, ink bright on a dark frame
    pub image: GrayImage,
    /// Left edge on the plate canvas, used for reading order
    pub x: u32,
}

/// Final outcome of a recognition call
#[derive(Debug, Clone, Default)]
pub struct RecognizedPlate {
    /// Plate characters without sentinels; empty means nothing was recognized
    pub text: String,
    /// Crop of the winning plate region, if any region was found
    pub plate: Option<PlateCandidate>,
    /// Number of glyphs that went through classification
    pub glyph_count: usize,
}

impl RecognizedPlate {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
