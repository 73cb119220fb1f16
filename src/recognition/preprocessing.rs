use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};

use crate::error::{RecognitionError, Result};

/// Reject images that would feed garbage into the geometry code
pub fn validate_image(img: &DynamicImage) -> Result<()> {
    if img.width() == 0 || img.height() == 0 {
        return Err(RecognitionError::MalformedInput(format!(
            "image has zero dimension ({}x{})",
            img.width(),
            img.height()
        )));
    }
    Ok(())
}

/// Decode an encoded image held in memory, guessing the format from its header
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(RecognitionError::MalformedInput("empty image buffer".to_string()));
    }
    let img = image::load_from_memory(bytes)
        .map_err(|e| RecognitionError::MalformedInput(format!("failed to decode image: {}", e)))?;
    validate_image(&img)?;
    Ok(img)
}

/// Load and decode an image file
pub fn open_image(path: impl AsRef<std::path::Path>) -> Result<DynamicImage> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}

/// Scale an image down so its height does not exceed `target_height`.
/// Images already small enough are returned untouched.
pub fn normalize(img: DynamicImage, target_height: u32) -> Result<DynamicImage> {
    validate_image(&img)?;

    let (width, height) = (img.width(), img.height());
    if height <= target_height {
        return Ok(img);
    }

    let target_width =
        (width as f64 * target_height as f64 / height as f64).round().max(1.0) as u32;
    log::debug!(
        "Normalizing {}x{} -> {}x{}",
        width,
        height,
        target_width,
        target_height
    );

    Ok(img.resize_exact(target_width, target_height, FilterType::Triangle))
}

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Global binarization with an automatically chosen level.
/// Pixels brighter than the level become white (255), the rest black.
/// A uniform image has no level to find, so `base_threshold` is used instead.
pub fn binarize(gray: &GrayImage, base_threshold: u8) -> (GrayImage, u8) {
    let (min, max) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));

    let level = if min < max { otsu_level(gray) } else { base_threshold };
    (threshold(gray, level, ThresholdType::Binary), level)
}

/// Paint a background frame of `width` pixels on every edge
pub fn force_border(img: &mut GrayImage, width: u32, value: u8) {
    let (w, h) = img.dimensions();
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        if x < width || y < width || x + width >= w || y + width >= h {
            *pixel = Luma([value]);
        }
    }
}
