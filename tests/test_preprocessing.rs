//! Tests for image normalization and decoding.

mod common;

use image::{DynamicImage, ImageFormat};
use plateread::recognition::preprocessing::{binarize, force_border};
use plateread::recognition::{decode_image, normalize};
use std::io::Cursor;

use common::*;

#[test]
fn test_normalize_scales_tall_image() -> anyhow::Result<()> {
    let img = DynamicImage::ImageRgb8(blank_image(1000, 1440));

    let normalized = normalize(img, 720)?;

    assert_eq!(normalized.height(), 720);
    assert_eq!(normalized.width(), 500);
    Ok(())
}

#[test]
fn test_normalize_rounds_width() -> anyhow::Result<()> {
    // 333 * 720 / 1000 = 239.76
    let img = DynamicImage::ImageRgb8(blank_image(333, 1000));

    let normalized = normalize(img, 720)?;

    assert_eq!((normalized.width(), normalized.height()), (240, 720));
    Ok(())
}

#[test]
fn test_normalize_keeps_small_image() -> anyhow::Result<()> {
    let img = DynamicImage::ImageRgb8(synthetic_plate());

    let normalized = normalize(img.clone(), 720)?;

    assert_eq!(normalized, img);
    Ok(())
}

#[test]
fn test_normalize_is_idempotent() -> anyhow::Result<()> {
    let img = DynamicImage::ImageRgb8(blank_image(640, 2000));

    let once = normalize(img, 720)?;
    let twice = normalize(once.clone(), 720)?;

    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn test_zero_sized_image_is_rejected() {
    let img = DynamicImage::new_rgb8(0, 0);

    let result = normalize(img, 720);

    assert!(matches!(result, Err(RecognitionError::MalformedInput(_))));
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(matches!(
        decode_image(b"definitely not an image"),
        Err(RecognitionError::MalformedInput(_))
    ));
    assert!(matches!(decode_image(&[]), Err(RecognitionError::MalformedInput(_))));
}

#[test]
fn test_decode_png_bytes() -> anyhow::Result<()> {
    let mut bytes = Vec::new();
    synthetic_plate().write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    let img = decode_image(&bytes)?;

    assert_eq!((img.width(), img.height()), (200, 100));
    Ok(())
}

#[test]
fn test_binarize_and_border() {
    let mut img = blank_image(40, 20);
    draw_solid(&mut img, 10, 5, 10, 10);
    let gray = DynamicImage::ImageRgb8(img).to_luma8();

    let (mut binary, _level) = binarize(&gray, 112);
    assert_eq!(binary.get_pixel(15, 10)[0], 0);
    assert_eq!(binary.get_pixel(30, 10)[0], 255);

    // Uniform black image falls back to the base threshold
    let (mut dark, level) = binarize(&image::GrayImage::new(10, 10), 112);
    assert_eq!(level, 112);
    force_border(&mut dark, 3, 255);
    assert_eq!(dark.get_pixel(0, 0)[0], 255);
    assert_eq!(dark.get_pixel(9, 5)[0], 255);
    assert_eq!(dark.get_pixel(7, 7)[0], 255);
    assert_eq!(dark.get_pixel(6, 6)[0], 0);
    assert_eq!(dark.get_pixel(3, 3)[0], 0);

    force_border(&mut binary, 3, 255);
    assert_eq!(binary.get_pixel(2, 10)[0], 255);
}
