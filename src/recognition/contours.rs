use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

use crate::models::GlyphBox;

/// Mark the dark (ink) pixels of a binarized image as foreground
pub fn ink_mask(binary: &GrayImage) -> GrayImage {
    let mut mask = binary.clone();
    for pixel in mask.pixels_mut() {
        *pixel = Luma([if pixel[0] == 0 { 255 } else { 0 }]);
    }
    mask
}

/// Trace the outer borders of all foreground regions, largest area first
pub fn outer_contours(mask: &GrayImage) -> Vec<GlyphBox> {
    let mut boxes: Vec<GlyphBox> = find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && !c.points.is_empty())
        .map(|c| bounding_box(&c.points))
        .collect();

    // Stable, so equal areas keep tracing order
    boxes.sort_by(|a, b| b.area.total_cmp(&a.area));
    boxes
}

fn bounding_box(points: &[Point<i32>]) -> GlyphBox {
    let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
    let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    GlyphBox {
        min_x: min_x as u32,
        min_y: min_y as u32,
        max_x: max_x as u32,
        max_y: max_y as u32,
        area: polygon_area(points),
    }
}

/// Shoelace area of the closed polygon through `points`
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64)
        .sum();
    (twice as f64 / 2.0).abs()
}
