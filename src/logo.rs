use image::{RgbImage, RgbaImage, imageops::FilterType};

use crate::config::ComposerConfig;

/// Decode and shrink an uploaded logo.
///
/// Best-effort: any decode or processing failure is logged and yields `None`,
/// and the thumbnail is composed without a logo. Opaque sources gain a full
/// alpha channel; the size clamps are maxima, so smaller logos keep their
/// natural dimensions.
pub fn process_logo(bytes: &[u8], config: &ComposerConfig) -> Option<RgbaImage> {
    let decoded = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(err) => {
            tracing::warn!(%err, "logo decode failed, composing without logo");
            return None;
        }
    };

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    let aspect = f64::from(width) / f64::from(height);

    let (new_width, new_height) = if width > height {
        let w = config.logo_max_width().min(width);
        (w, ((f64::from(w) / aspect).round() as u32).max(1))
    } else {
        let h = config.logo_max_height().min(height);
        (((f64::from(h) * aspect).round() as u32).max(1), h)
    };

    if (new_width, new_height) == (width, height) {
        tracing::debug!(width, height, "logo already within bounds");
        return Some(rgba);
    }

    tracing::debug!(width, height, new_width, new_height, "logo resized");
    Some(image::imageops::resize(
        &rgba,
        new_width,
        new_height,
        FilterType::Lanczos3,
    ))
}

/// Alpha-blend `logo` into the bottom-right corner of `canvas`, inset by
/// `margin` from both edges. Transparent logo pixels leave the background
/// untouched.
pub fn overlay_logo(canvas: &mut RgbImage, logo: &RgbaImage, margin: u32) {
    let (canvas_w, canvas_h) = canvas.dimensions();
    let (logo_w, logo_h) = logo.dimensions();
    let x0 = canvas_w.saturating_sub(logo_w + margin);
    let y0 = canvas_h.saturating_sub(logo_h + margin);

    for (lx, ly, px) in logo.enumerate_pixels() {
        let alpha = u32::from(px[3]);
        if alpha == 0 {
            continue;
        }
        let cx = x0 + lx;
        let cy = y0 + ly;
        if cx >= canvas_w || cy >= canvas_h {
            continue;
        }
        let dst = canvas.get_pixel_mut(cx, cy);
        for c in 0..3 {
            dst[c] = blend_channel(px[c], dst[c], alpha);
        }
    }

    tracing::debug!(x0, y0, logo_w, logo_h, "logo composited");
}

/// Straight-alpha source over opaque destination, rounded to nearest.
fn blend_channel(src: u8, dst: u8, alpha: u32) -> u8 {
    let inv = 255 - alpha;
    ((u32::from(src) * alpha + u32::from(dst) * inv + 127) / 255) as u8
}
