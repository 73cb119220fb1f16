use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::config::RecognitionConfig;
use crate::error::Result;
use crate::inference::RegionDetector;
use crate::models::{PlateCandidate, Rectangle};
use crate::recognition::preprocessing::validate_image;

/// Colour of the diagnostic frames drawn around detector regions
pub const ANNOTATION_COLOR: Rgb<u8> = Rgb([172, 224, 51]);

/// Picks the plate region among the detector's proposals and crops it
#[derive(Debug, Clone)]
pub struct PlateRegionDetector {
    /// Fraction of height (and width, for short regions) trimmed per side
    pub trim_ratio: f32,
    /// Regions taller than this are only trimmed vertically
    pub trim_height_cutoff: u32,
}

impl PlateRegionDetector {
    pub fn new(config: &RecognitionConfig) -> Self {
        Self {
            trim_ratio: config.trim_ratio,
            trim_height_cutoff: config.trim_height_cutoff,
        }
    }

    /// Shrink a detected region by the proportional margins.
    /// Tall regions keep their full width so edge characters are not clipped.
    pub fn trim(&self, region: &Rectangle) -> Option<Rectangle> {
        let a = (self.trim_ratio * region.height as f32).round() as u32;
        let b = if region.height > self.trim_height_cutoff {
            0
        } else {
            (self.trim_ratio * region.width as f32).round() as u32
        };

        let width = region.width.checked_sub(b.checked_mul(2)?)?;
        let height = region.height.checked_sub(a.checked_mul(2)?)?;
        let x = region.x.checked_add(i32::try_from(b).ok()?)?;
        let y = region.y.checked_add(i32::try_from(a).ok()?)?;
        Rectangle::new(x, y, width, height)
    }

    /// Run the region detector and keep the widest usable region.
    ///
    /// Returns an annotated copy of the image with every proposal framed, and
    /// the winning candidate. `None` means no plate was found, which is not an
    /// error: the detector may report nothing, or only regions that vanish
    /// once trimmed and clipped to the image.
    pub fn detect(
        &self,
        image: &DynamicImage,
        detector: &dyn RegionDetector,
    ) -> Result<(RgbImage, Option<PlateCandidate>)> {
        validate_image(image)?;

        let rgb = image.to_rgb8();
        let regions = detector.detect_regions(&rgb)?;
        log::debug!("Region detector proposed {} regions", regions.len());

        let mut best: Option<PlateCandidate> = None;
        for region in &regions {
            let Some(crop_rect) = self
                .trim(region)
                .and_then(|r| r.clip_to(rgb.width(), rgb.height()))
            else {
                log::warn!("Skipping degenerate plate region {:?}", region);
                continue;
            };

            let widest = best.as_ref().map_or(0, |b| b.region.width);
            if region.width > widest {
                let crop = image::imageops::crop_imm(
                    &rgb,
                    crop_rect.x as u32,
                    crop_rect.y as u32,
                    crop_rect.width,
                    crop_rect.height,
                )
                .to_image();

                best = Some(PlateCandidate {
                    region: *region,
                    crop_rect,
                    crop,
                });
            }
        }

        if let Some(plate) = &best {
            log::debug!(
                "Selected plate region {:?}, crop {}x{}",
                plate.region,
                plate.crop.width(),
                plate.crop.height()
            );
        }

        Ok((annotate(&rgb, &regions), best))
    }
}

/// Draw a 3px diagnostic frame for every region, inset 2px on the left and
/// pulled up from the right and bottom edges
pub fn annotate(image: &RgbImage, regions: &[Rectangle]) -> RgbImage {
    let mut annotated = image.clone();
    let (width, height) = image.dimensions();

    for region in regions {
        for grow in -1..=1 {
            if let Some(rect) = frame_rect(region, grow, width, height) {
                draw_hollow_rect_mut(&mut annotated, rect, ANNOTATION_COLOR);
            }
        }
    }

    annotated
}

/// One ring of a region's frame, clipped to a 1px margin around the image.
/// Sides outside that margin are invisible either way.
fn frame_rect(region: &Rectangle, grow: i64, width: u32, height: u32) -> Option<Rect> {
    let left = region.x as i64 + 2 - grow;
    let top = region.y as i64 - grow;
    let right = left + region.width as i64 - 4 + 2 * grow;
    let bottom = top + region.height as i64 - 4 + 2 * grow;
    if right <= left || bottom <= top {
        return None;
    }

    let (x0, y0) = (left.max(-1), top.max(-1));
    let x1 = right.min(width as i64 + 1);
    let y1 = bottom.min(height as i64 + 1);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32))
}
