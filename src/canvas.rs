use image::{DynamicImage, RgbImage, imageops::FilterType};

use crate::foundation::error::{ThumbsmithError, ThumbsmithResult};

/// Source and target aspect ratios closer than this are resized directly
/// instead of cover-cropped.
const ASPECT_TOLERANCE: f64 = 0.01;

/// Decode background bytes. A background that cannot be decoded aborts the
/// whole composition.
pub fn decode_background(bytes: &[u8]) -> ThumbsmithResult<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| ThumbsmithError::decode(format!("background image: {e}")))
}

/// Scale and crop `source` to exactly `target_w` x `target_h` RGB pixels.
///
/// Ratios within [`ASPECT_TOLERANCE`] get a plain high-quality resize. All
/// other inputs are scaled to cover the target box and center-cropped, so the
/// output never letterboxes and the crop is symmetric on both edges.
pub fn normalize_to_canvas(source: &DynamicImage, target_w: u32, target_h: u32) -> RgbImage {
    let rgb = source.to_rgb8();
    let (src_w, src_h) = rgb.dimensions();

    let target_ratio = f64::from(target_w) / f64::from(target_h);
    let source_ratio = f64::from(src_w) / f64::from(src_h);

    tracing::debug!(
        src_w,
        src_h,
        source_ratio,
        target_ratio,
        "normalizing background to canvas"
    );

    if (source_ratio - target_ratio).abs() < ASPECT_TOLERANCE {
        return image::imageops::resize(&rgb, target_w, target_h, FilterType::Lanczos3);
    }

    if source_ratio > target_ratio {
        // Wider than the canvas: match the target height, crop excess width.
        let scaled_w = ((f64::from(src_w) * f64::from(target_h) / f64::from(src_h)).round()
            as u32)
            .max(target_w);
        let scaled = image::imageops::resize(&rgb, scaled_w, target_h, FilterType::Lanczos3);
        let left = (scaled_w - target_w) / 2;
        image::imageops::crop_imm(&scaled, left, 0, target_w, target_h).to_image()
    } else {
        // Taller than the canvas: match the target width, crop excess height.
        let scaled_h = ((f64::from(src_h) * f64::from(target_w) / f64::from(src_w)).round()
            as u32)
            .max(target_h);
        let scaled = image::imageops::resize(&rgb, target_w, scaled_h, FilterType::Lanczos3);
        let top = (scaled_h - target_h) / 2;
        image::imageops::crop_imm(&scaled, 0, top, target_w, target_h).to_image()
    }
}
