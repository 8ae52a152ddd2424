use anyhow::Context as _;
use image::{ExtendedColorType, RgbImage, codecs::jpeg::JpegEncoder};

use crate::config::ComposerConfig;
use crate::foundation::error::ThumbsmithResult;

/// Encode `canvas` as JPEG, stepping the quality down from
/// `jpeg_quality_start` until the byte budget is met or the floor would be
/// crossed.
///
/// The byte budget is best-effort: when even the last tried quality misses
/// it, that encoding is returned rather than an error, and callers must not
/// treat the budget as a hard postcondition.
pub fn encode_size_bounded(canvas: &RgbImage, config: &ComposerConfig) -> ThumbsmithResult<Vec<u8>> {
    let (width, height) = canvas.dimensions();
    let floor = i32::from(config.jpeg_quality_floor);
    let step = i32::from(config.jpeg_quality_step);
    let mut quality = i32::from(config.jpeg_quality_start);

    let mut last = Vec::new();
    while quality >= floor {
        let mut buf = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality as u8);
        encoder
            .encode(canvas.as_raw(), width, height, ExtendedColorType::Rgb8)
            .context("encode jpeg")?;

        tracing::debug!(quality, bytes = buf.len(), "jpeg encode attempt");

        if buf.len() <= config.max_output_bytes {
            tracing::info!(quality, bytes = buf.len(), "jpeg within byte budget");
            return Ok(buf);
        }

        last = buf;
        quality -= step;
    }

    tracing::warn!(
        bytes = last.len(),
        budget = config.max_output_bytes,
        "byte budget unmet at the quality floor, returning best effort"
    );
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mix64(mut z: u64) -> u64 {
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Deterministic high-entropy canvas so JPEG sizes are meaningfully large.
    fn noise_canvas(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            let v = mix64((u64::from(y) << 32) | u64::from(x));
            image::Rgb([v as u8, (v >> 8) as u8, (v >> 16) as u8])
        })
    }

    fn cfg_with_budget(max_output_bytes: usize) -> ComposerConfig {
        ComposerConfig {
            max_output_bytes,
            ..ComposerConfig::default()
        }
    }

    fn size_at_quality(canvas: &RgbImage, quality: u8) -> usize {
        let cfg = ComposerConfig {
            jpeg_quality_start: quality,
            jpeg_quality_floor: quality,
            max_output_bytes: usize::MAX,
            ..ComposerConfig::default()
        };
        encode_size_bounded(canvas, &cfg).unwrap().len()
    }

    #[test]
    fn generous_budget_returns_the_start_quality_encoding() {
        let canvas = noise_canvas(320, 180);
        let out = encode_size_bounded(&canvas, &cfg_with_budget(usize::MAX)).unwrap();
        assert_eq!(out.len(), size_at_quality(&canvas, 92));
    }

    #[test]
    fn encoded_size_is_non_increasing_as_quality_drops() {
        let canvas = noise_canvas(320, 180);
        let mut last = usize::MAX;
        for quality in [92u8, 87, 82, 77] {
            let size = size_at_quality(&canvas, quality);
            assert!(size <= last, "quality {quality}: {size} > {last}");
            last = size;
        }
    }

    #[test]
    fn mid_range_budget_is_met_when_achievable() {
        let canvas = noise_canvas(320, 180);
        let at_start = size_at_quality(&canvas, 92);
        let at_floor = size_at_quality(&canvas, 77);
        assert!(at_floor < at_start, "fixture must compress further");

        let budget = (at_start + at_floor) / 2;
        let out = encode_size_bounded(&canvas, &cfg_with_budget(budget)).unwrap();
        assert!(out.len() <= budget);
    }

    #[test]
    fn impossible_budget_returns_the_floor_encoding() {
        let canvas = noise_canvas(320, 180);
        let out = encode_size_bounded(&canvas, &cfg_with_budget(1)).unwrap();
        assert!(!out.is_empty());
        assert!(out.len() > 1);
        // The walk from 92 by 5 bottoms out at 77, the last step >= 76.
        assert_eq!(out.len(), size_at_quality(&canvas, 77));
    }

    #[test]
    fn output_is_a_decodable_jpeg_of_the_same_dimensions() {
        let canvas = noise_canvas(64, 32);
        let out = encode_size_bounded(&canvas, &cfg_with_budget(usize::MAX)).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.to_rgb8().dimensions(), (64, 32));
    }
}
